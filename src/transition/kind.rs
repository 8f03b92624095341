use crate::{
    foundation::error::{DriftError, DriftResult},
    profile::model::TransitionSpec,
};

/// Direction a wipe boundary travels across the frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WipeDir {
    /// Boundary moves from the left edge to the right edge.
    LeftToRight,
    /// Boundary moves from the right edge to the left edge.
    RightToLeft,
    /// Boundary moves from the top edge to the bottom edge.
    TopToBottom,
    /// Boundary moves from the bottom edge to the top edge.
    BottomToTop,
}

/// Direction the incoming slide enters from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlideDir {
    /// Incoming slide enters from the left.
    FromLeft,
    /// Incoming slide enters from the right.
    FromRight,
    /// Incoming slide enters from the top.
    FromTop,
    /// Incoming slide enters from the bottom.
    FromBottom,
}

/// Parsed, validated transition style.
///
/// A `None` direction means the profile left it open; the transition engine
/// resolves it per slide from the session seed so replays stay identical.
#[derive(Clone, Debug, PartialEq)]
pub enum TransitionKind {
    /// Hard cut, no blend window.
    None,
    /// Linear alpha blend between outgoing and incoming.
    Crossfade,
    /// Spatial cutoff moving across the frame.
    Wipe {
        /// Travel direction, or seeded per-slide choice when absent.
        dir: Option<WipeDir>,
        /// Feathered boundary width as a fraction of the travel axis.
        soft_edge: f32,
    },
    /// Incoming slide pushes in over the outgoing one.
    Slide {
        /// Entry direction, or seeded per-slide choice when absent.
        dir: Option<SlideDir>,
    },
    /// Fade outgoing down to black, then incoming up from black.
    FadeToBlack,
}

/// Parse and validate a profile's transition specification.
///
/// Kind and direction strings are case-insensitive and accept the common
/// short aliases (`cut`, `ltr`, `down`, ...). Unknown kinds, directions,
/// and malformed params are validation errors.
pub fn parse_transition(spec: &TransitionSpec) -> DriftResult<TransitionKind> {
    let kind = spec.kind.trim().to_ascii_lowercase();
    if kind.is_empty() {
        return Err(DriftError::validation("transition kind must be non-empty"));
    }

    match kind.as_str() {
        "none" | "cut" => Ok(TransitionKind::None),
        "crossfade" => Ok(TransitionKind::Crossfade),
        "fade_to_black" | "fadetoblack" => Ok(TransitionKind::FadeToBlack),
        "wipe" => {
            let params = params_object(&spec.params, "wipe")?;

            let dir = match params.and_then(|p| p.get("dir")).and_then(|v| v.as_str()) {
                None => None,
                Some(s) => Some(match s.trim().to_ascii_lowercase().as_str() {
                    "left_to_right" | "lefttoright" | "ltr" => WipeDir::LeftToRight,
                    "right_to_left" | "righttoleft" | "rtl" => WipeDir::RightToLeft,
                    "top_to_bottom" | "toptobottom" | "ttb" => WipeDir::TopToBottom,
                    "bottom_to_top" | "bottomtotop" | "btt" => WipeDir::BottomToTop,
                    other => {
                        return Err(DriftError::validation(format!(
                            "unknown wipe.dir '{other}'"
                        )));
                    }
                }),
            };

            let soft_edge = match params
                .and_then(|p| p.get("soft_edge"))
                .and_then(|v| v.as_f64())
            {
                None => 0.0,
                Some(v) => {
                    let f = v as f32;
                    if !f.is_finite() {
                        return Err(DriftError::validation(
                            "wipe.soft_edge must be finite when set",
                        ));
                    }
                    f.clamp(0.0, 1.0)
                }
            };

            Ok(TransitionKind::Wipe { dir, soft_edge })
        }
        "slide" => {
            let params = params_object(&spec.params, "slide")?;

            let dir = match params.and_then(|p| p.get("dir")).and_then(|v| v.as_str()) {
                None => None,
                Some(s) => Some(match s.trim().to_ascii_lowercase().as_str() {
                    "from_left" | "left" => SlideDir::FromLeft,
                    "from_right" | "right" => SlideDir::FromRight,
                    "from_top" | "top" | "up" => SlideDir::FromTop,
                    "from_bottom" | "bottom" | "down" => SlideDir::FromBottom,
                    other => {
                        return Err(DriftError::validation(format!(
                            "unknown slide.dir '{other}'"
                        )));
                    }
                }),
            };

            Ok(TransitionKind::Slide { dir })
        }
        _ => Err(DriftError::validation(format!(
            "unknown transition kind '{kind}'"
        ))),
    }
}

fn params_object<'a>(
    params: &'a serde_json::Value,
    kind: &str,
) -> DriftResult<Option<&'a serde_json::Map<String, serde_json::Value>>> {
    if params.is_null() {
        return Ok(None);
    }
    params
        .as_object()
        .map(Some)
        .ok_or_else(|| DriftError::validation(format!("{kind} params must be an object")))
}

#[cfg(test)]
#[path = "../../tests/unit/transition/kind.rs"]
mod tests;
