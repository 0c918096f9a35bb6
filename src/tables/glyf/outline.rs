use crate::common::Point;
use crate::error::{DecodeError, bail, bail_if, bail_with_msg_if};
use crate::tables::glyf::{Anchor, BBox, Glyph};
use crate::tables::head::Head;
use crate::tables::loca::Loca;
use crate::tables::maxp::Maxp;

/// Deepest composite nesting resolved regardless of what the font declares
pub const MAX_COMPOSITE_DEPTH: u16 = 32;

/// Bounds on composite glyph resolution
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OutlineLimits {
    /// Levels of composite nesting. A composite built only from simple glyphs has depth 1.
    pub max_depth: u16,
    /// Direct components allowed in a single composite glyph
    pub max_components: u16,
}

impl OutlineLimits {
    /// The limits the font declares in `maxp`. Zero is raised to 1 so fonts that leave the
    /// fields unset can still resolve single-level composites.
    pub fn from_maxp(maxp: &Maxp) -> Self {
        Self {
            max_depth: maxp.max_component_depth,
            max_components: maxp.max_component_elements,
        }
        .clamped()
    }

    /// Depth limited to `1..=MAX_COMPOSITE_DEPTH`, component count to at least 1.
    fn clamped(self) -> Self {
        Self {
            max_depth: self.max_depth.clamp(1, MAX_COMPOSITE_DEPTH),
            max_components: self.max_components.max(1),
        }
    }
}

/// A resolved glyph outline in font units
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Outline {
    pub points: Vec<Point>,
    /// Index into `points` of the last point of each contour
    pub contour_ends: Vec<u16>,
}

impl Outline {
    pub fn num_contours(&self) -> usize {
        self.contour_ends.len()
    }

    /// Box around every point, or `None` for an empty outline.
    pub fn bbox(&self) -> Option<BBox> {
        let first = self.points.first()?;
        let mut bbox = (first.x, first.y, first.x, first.y);
        for point in &self.points[1..] {
            bbox.0 = bbox.0.min(point.x);
            bbox.1 = bbox.1.min(point.y);
            bbox.2 = bbox.2.max(point.x);
            bbox.3 = bbox.3.max(point.y);
        }
        let clamp = |v: i32| v.clamp(i16::MIN as i32, i16::MAX as i32) as i16;
        Some(BBox {
            x_min: clamp(bbox.0),
            y_min: clamp(bbox.1),
            x_max: clamp(bbox.2),
            y_max: clamp(bbox.3),
        })
    }

    fn translate(&mut self, dx: i32, dy: i32) {
        if dx == 0 && dy == 0 {
            return;
        }
        for point in &mut self.points {
            point.x = point.x.wrapping_add(dx);
            point.y = point.y.wrapping_add(dy);
        }
    }

    /// Append `other`, renumbering its contour ends past the points already present.
    fn append(&mut self, other: Outline) -> Result<(), DecodeError> {
        let base = self.points.len();
        for end in other.contour_ends {
            let end = base + end as usize;
            bail_with_msg_if!(
                end > u16::MAX as usize,
                DecodeError::LimitExceeded,
                "composite outline has more than {} points",
                (u16::MAX)
            );
            self.contour_ends.push(end as u16);
        }
        self.points.extend(other.points);
        Ok(())
    }
}

/// Decodes glyph outlines out of a `glyf`/`loca` pair, resolving composites.
///
/// Every request is independent: a failure anywhere in a composite's component graph fails
/// the whole request and no partial outline is returned.
#[derive(Copy, Clone)]
pub struct GlyphOutliner<'a> {
    glyf: &'a [u8],
    loca: Loca<'a>,
    limits: OutlineLimits,
}

impl<'a> GlyphOutliner<'a> {
    pub fn new(glyf: &'a [u8], loca: &'a [u8], head: &Head, maxp: &Maxp) -> Self {
        Self {
            glyf,
            loca: Loca::new(loca, head),
            limits: OutlineLimits::from_maxp(maxp),
        }
    }

    /// Replace the limits taken from `maxp`. The depth is still capped at
    /// [`MAX_COMPOSITE_DEPTH`].
    pub fn with_limits(mut self, limits: OutlineLimits) -> Self {
        self.limits = limits.clamped();
        self
    }

    pub fn limits(&self) -> OutlineLimits {
        self.limits
    }

    pub fn num_glyphs(&self) -> usize {
        self.loca.num_glyphs()
    }

    /// The decoded record for `glyph_id`, without resolving components.
    pub fn glyph(&self, glyph_id: u16) -> Result<Glyph<'a>, DecodeError> {
        let range = self.loca.glyph_range(glyph_id)?;
        bail_with_msg_if!(
            range.end > self.glyf.len(),
            DecodeError::Malformed,
            "glyph {} runs past the end of glyf",
            glyph_id
        );
        Glyph::parse(&self.glyf[range])
    }

    pub fn is_space(&self, glyph_id: u16) -> Result<bool, DecodeError> {
        self.loca.is_space(glyph_id)
    }

    /// Number of contours, summed over all components for composites.
    pub fn contour_count(&self, glyph_id: u16) -> Result<usize, DecodeError> {
        match self.glyph(glyph_id)? {
            Glyph::Empty => Ok(0),
            Glyph::Simple(simple) => Ok(simple.contour_count()),
            Glyph::Composite(_) => Ok(self.outline(glyph_id)?.num_contours()),
        }
    }

    pub fn contour_end_points(&self, glyph_id: u16) -> Result<Vec<u16>, DecodeError> {
        match self.glyph(glyph_id)? {
            Glyph::Empty => Ok(Vec::new()),
            Glyph::Simple(simple) => simple.contour_end_points(),
            Glyph::Composite(_) => Ok(self.outline(glyph_id)?.contour_ends),
        }
    }

    pub fn points(&self, glyph_id: u16) -> Result<Vec<Point>, DecodeError> {
        Ok(self.outline(glyph_id)?.points)
    }

    /// Fully resolved outline. Empty glyphs give an empty outline.
    pub fn outline(&self, glyph_id: u16) -> Result<Outline, DecodeError> {
        let mut outline = Outline::default();
        self.append_glyph(glyph_id, 0, &mut outline)?;
        Ok(outline)
    }

    /// The stored box for simple glyphs; the box of the resolved points for composites.
    pub fn bbox(&self, glyph_id: u16) -> Result<Option<BBox>, DecodeError> {
        match self.glyph(glyph_id)? {
            Glyph::Empty => Ok(None),
            Glyph::Simple(simple) => Ok(Some(simple.bbox())),
            Glyph::Composite(_) => Ok(self.outline(glyph_id)?.bbox()),
        }
    }

    /// Whether any direct component of a composite is itself a composite.
    ///
    /// Looks one level down only. Simple and empty glyphs are never deep.
    pub fn is_deep_composite(&self, glyph_id: u16) -> Result<bool, DecodeError> {
        let Glyph::Composite(composite) = self.glyph(glyph_id)? else {
            return Ok(false);
        };
        for component in composite.components() {
            if let Glyph::Composite(_) = self.glyph(component?.glyph_id)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn append_glyph(
        &self,
        glyph_id: u16,
        depth: u16,
        outline: &mut Outline,
    ) -> Result<(), DecodeError> {
        let composite = match self.glyph(glyph_id)? {
            Glyph::Empty => return Ok(()),
            Glyph::Simple(simple) => {
                return outline.append(Outline {
                    points: simple.points()?,
                    contour_ends: simple.contour_end_points()?,
                });
            }
            Glyph::Composite(composite) => composite,
        };

        if depth >= self.limits.max_depth {
            log::warn!(
                "glyph {glyph_id}: composite nesting exceeds depth {}",
                self.limits.max_depth
            );
            bail!(DecodeError::LimitExceeded);
        }

        // anchor point indices count from the first point of this composite
        let start = outline.points.len();
        for (index, component) in composite.components().enumerate() {
            let component = component?;
            if index >= self.limits.max_components as usize {
                log::warn!(
                    "glyph {glyph_id}: more than {} components",
                    self.limits.max_components
                );
                bail!(DecodeError::LimitExceeded);
            }
            log::trace!(
                "glyph {glyph_id}: component {index} -> glyph {} {:?}",
                component.glyph_id,
                component.anchor
            );

            let mut part = Outline::default();
            self.append_glyph(component.glyph_id, depth + 1, &mut part)?;
            component.transform.apply(&mut part.points);

            let (dx, dy) = match component.anchor {
                Anchor::Offset { dx, dy } => (dx, dy),
                Anchor::Points { base, component } => {
                    let base_point = outline.points.get(start + base as usize);
                    let component_point = part.points.get(component as usize);
                    let (Some(base_point), Some(component_point)) = (base_point, component_point)
                    else {
                        log::debug!(
                            "glyph {glyph_id}: anchor points {base}/{component} out of range"
                        );
                        bail!();
                    };
                    (
                        base_point.x.wrapping_sub(component_point.x),
                        base_point.y.wrapping_sub(component_point.y),
                    )
                }
            };
            part.translate(dx, dy);
            outline.append(part)?;
        }
        bail_if!(
            outline.points.len() > u16::MAX as usize + 1,
            DecodeError::LimitExceeded
        );
        Ok(())
    }
}
