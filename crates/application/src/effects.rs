//! Cosmetic effects.
//!
//! Effects never touch the selection. The controller queues them with a
//! delay and the driver either plays or drops them.

use std::time::Duration;

use polaroid_studio_domain::ImageId;
use rand::Rng;
use serde::Serialize;

pub const SPARKLE_COUNT: usize = 8;
pub const SPARKLE_STAGGER: Duration = Duration::from_millis(50);
pub const SPARKLE_LIFETIME: Duration = Duration::from_millis(1000);
pub const SPARKLE_SPREAD: f32 = 100.0;
pub const SPARKLE_SIZE: f32 = 10.0;
pub const SPARKLE_RISE: f32 = 50.0;

/// Vertical offset of the chosen presentation type card.
pub const RAISED_OPTION_LIFT: f32 = -8.0;
pub const HOVER_LIFT: f32 = -5.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Section {
    Upload,
    PresentationType,
    ColorTheme,
    Confirmation,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sparkle {
    pub position: ScreenPoint,
    pub delay: Duration,
    pub lifetime: Duration,
    pub size: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Effect {
    FadeInThumbnail(ImageId),
    ExpandSection(Section),
    /// Show the confirmation panel and scroll it to the middle of the view.
    RevealConfirmation,
    ScrollIntoView(Section),
    SparkleBurst(Vec<Sparkle>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledEffect {
    pub delay: Duration,
    pub effect: Effect,
}

/// One frame of a sparkle animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SparkleFrame {
    pub scale: f32,
    pub rise: f32,
    pub opacity: f32,
}

pub fn sparkle_burst<R: Rng>(center: ScreenPoint, rng: &mut R) -> Vec<Sparkle> {
    let half = SPARKLE_SPREAD / 2.0;
    (0..SPARKLE_COUNT)
        .map(|index| Sparkle {
            position: ScreenPoint {
                x: center.x + rng.gen_range(-half..half),
                y: center.y + rng.gen_range(-half..half),
            },
            delay: SPARKLE_STAGGER * index as u32,
            lifetime: SPARKLE_LIFETIME,
            size: SPARKLE_SIZE,
        })
        .collect()
}

/// Animation state `elapsed` after the burst fired, or `None` once the
/// sparkle is not yet born or already removed.
pub fn sparkle_frame(sparkle: &Sparkle, elapsed: Duration) -> Option<SparkleFrame> {
    let age = elapsed.checked_sub(sparkle.delay)?;
    if age >= sparkle.lifetime {
        return None;
    }

    let t = age.as_secs_f32() / sparkle.lifetime.as_secs_f32();
    let eased = 1.0 - (1.0 - t) * (1.0 - t);
    Some(SparkleFrame {
        scale: 2.0 * eased,
        rise: SPARKLE_RISE * eased,
        opacity: 1.0 - eased,
    })
}

/// Lift applied to a wizard panel under the pointer. Collapsed panels stay put.
pub fn hover_lift(hovered: bool, expanded: bool) -> f32 {
    if hovered && expanded {
        HOVER_LIFT
    } else {
        0.0
    }
}

pub fn option_lift(selected: bool) -> f32 {
    if selected {
        RAISED_OPTION_LIFT
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn burst_emits_staggered_particles_near_center() {
        let mut rng = StdRng::seed_from_u64(7);
        let center = ScreenPoint { x: 200.0, y: 100.0 };
        let burst = sparkle_burst(center, &mut rng);

        assert_eq!(burst.len(), SPARKLE_COUNT);
        for (index, sparkle) in burst.iter().enumerate() {
            assert_eq!(sparkle.delay, Duration::from_millis(50 * index as u64));
            assert_eq!(sparkle.lifetime, Duration::from_millis(1000));
            assert!((sparkle.position.x - center.x).abs() <= 50.0);
            assert!((sparkle.position.y - center.y).abs() <= 50.0);
        }
    }

    #[test]
    fn sparkle_frames_cover_only_the_lifetime() {
        let sparkle = Sparkle {
            position: ScreenPoint { x: 0.0, y: 0.0 },
            delay: Duration::from_millis(100),
            lifetime: SPARKLE_LIFETIME,
            size: SPARKLE_SIZE,
        };

        assert!(sparkle_frame(&sparkle, Duration::from_millis(50)).is_none());
        let start = sparkle_frame(&sparkle, Duration::from_millis(100)).expect("frame");
        assert_eq!(start.scale, 0.0);
        assert_eq!(start.opacity, 1.0);
        let middle = sparkle_frame(&sparkle, Duration::from_millis(600)).expect("frame");
        assert!(middle.scale > 0.0 && middle.scale < 2.0);
        assert!(middle.rise > 0.0);
        assert!(sparkle_frame(&sparkle, Duration::from_millis(1100)).is_none());
    }

    #[test]
    fn hover_only_lifts_expanded_panels() {
        assert_eq!(hover_lift(true, true), HOVER_LIFT);
        assert_eq!(hover_lift(true, false), 0.0);
        assert_eq!(hover_lift(false, true), 0.0);
    }
}
