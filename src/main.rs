use std::error::Error;

use ttf_decode::{DecodeError, FontRef};

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args();
    let Some(infile) = args.nth(1) else {
        eprintln!("usage: ttf-decode <font.ttf> [characters]");
        std::process::exit(2);
    };
    let chars = args.next().unwrap_or_default();

    println!("Reading from {infile}");
    let data = std::fs::read(&infile)?;
    let font = FontRef::new(&data)?;

    match font.family_name() {
        Ok(family) => println!("Family: {family}"),
        Err(err) => println!("Family: <{err}>"),
    }
    println!("Units per em: {}", font.head().units_per_em);
    println!("Glyphs: {}", font.num_glyphs());
    println!(
        "Bold: {}, italic: {}",
        font.is_bold().unwrap_or(false),
        font.is_italic().unwrap_or(false)
    );
    if !font.checksums_valid()? {
        println!("Warning: table checksums do not match");
    }

    let outliner = font.outliner()?;
    for c in chars.chars() {
        let glyph_id = font.map_char(c)?;
        let advance = font.hor_metrics(glyph_id).map(|metrics| metrics.advance_width);
        let outline = match outliner.outline(glyph_id) {
            Ok(outline) => outline,
            Err(DecodeError::LimitExceeded) => {
                println!("{c:?}: glyph {glyph_id} nests too deeply");
                continue;
            }
            Err(err) => return Err(err.into()),
        };
        println!(
            "{c:?}: glyph {glyph_id}, advance {advance:?}, {} contours, {} points",
            outline.num_contours(),
            outline.points.len()
        );
    }

    Ok(())
}
