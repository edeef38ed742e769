//! Built-in gesture table used when no descriptor file is configured.

use crate::{
    gesture::descriptor::{
        DescriptorBuilder, DescriptorError, DescriptorRegistry, GestureDescriptor,
    },
    types::{Finger, FingerCurl, FingerDirection},
};

pub const YOO: &str = "yoo!";
pub const SCROLL: &str = "scroll";
pub const PLAN: &str = "plan!";
pub const PRICE: &str = "price!";
pub const HOME: &str = "home!";
pub const THUMBS_UP: &str = "thumbs_up";
pub const VICTORY: &str = "victory";

const FINGERS: [Finger; 4] = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];

fn extended_up(builder: DescriptorBuilder, finger: Finger) -> DescriptorBuilder {
    builder
        .curl(finger, FingerCurl::NoCurl, 1.0)
        .curl(finger, FingerCurl::HalfCurl, 0.25)
        .direction(finger, FingerDirection::VerticalUp, 1.0)
        .direction(finger, FingerDirection::DiagonalUpLeft, 0.9)
        .direction(finger, FingerDirection::DiagonalUpRight, 0.9)
}

fn tucked(builder: DescriptorBuilder, finger: Finger) -> DescriptorBuilder {
    builder
        .curl(finger, FingerCurl::FullCurl, 1.0)
        .curl(finger, FingerCurl::HalfCurl, 0.9)
        .direction(finger, FingerDirection::VerticalDown, 1.0)
        .direction(finger, FingerDirection::DiagonalDownLeft, 0.8)
        .direction(finger, FingerDirection::DiagonalDownRight, 0.8)
        .direction(finger, FingerDirection::HorizontalLeft, 0.6)
        .direction(finger, FingerDirection::HorizontalRight, 0.6)
}

type ThumbRule = fn(DescriptorBuilder) -> DescriptorBuilder;

fn gesture(name: &str, extended: &[Finger], thumb: ThumbRule) -> GestureDescriptor {
    let builder = FINGERS
        .into_iter()
        .fold(GestureDescriptor::builder(name), |b, finger| {
            if extended.contains(&finger) {
                extended_up(b, finger)
            } else {
                tucked(b, finger)
            }
        });
    thumb(builder).build()
}

fn thumb_up(builder: DescriptorBuilder) -> DescriptorBuilder {
    extended_up(builder, Finger::Thumb)
}

fn thumb_out(builder: DescriptorBuilder) -> DescriptorBuilder {
    builder
        .curl(Finger::Thumb, FingerCurl::NoCurl, 1.0)
        .curl(Finger::Thumb, FingerCurl::HalfCurl, 0.5)
        .direction(Finger::Thumb, FingerDirection::HorizontalLeft, 1.0)
        .direction(Finger::Thumb, FingerDirection::HorizontalRight, 1.0)
        .direction(Finger::Thumb, FingerDirection::DiagonalUpLeft, 0.9)
        .direction(Finger::Thumb, FingerDirection::DiagonalUpRight, 0.9)
}

fn thumb_down(builder: DescriptorBuilder) -> DescriptorBuilder {
    builder
        .curl(Finger::Thumb, FingerCurl::NoCurl, 1.0)
        .direction(Finger::Thumb, FingerDirection::VerticalDown, 1.0)
        .direction(Finger::Thumb, FingerDirection::DiagonalDownLeft, 0.9)
        .direction(Finger::Thumb, FingerDirection::DiagonalDownRight, 0.9)
}

fn thumb_tucked(builder: DescriptorBuilder) -> DescriptorBuilder {
    builder
        .curl(Finger::Thumb, FingerCurl::HalfCurl, 1.0)
        .curl(Finger::Thumb, FingerCurl::FullCurl, 1.0)
        .direction(Finger::Thumb, FingerDirection::DiagonalUpLeft, 0.8)
        .direction(Finger::Thumb, FingerDirection::DiagonalUpRight, 0.8)
        .direction(Finger::Thumb, FingerDirection::HorizontalLeft, 0.8)
        .direction(Finger::Thumb, FingerDirection::HorizontalRight, 0.8)
        .direction(Finger::Thumb, FingerDirection::VerticalUp, 0.6)
}

pub fn builtin_descriptors() -> Vec<GestureDescriptor> {
    vec![
        gesture(YOO, &[Finger::Index, Finger::Pinky], thumb_out),
        gesture(SCROLL, &[Finger::Index], thumb_tucked),
        gesture(PLAN, &[Finger::Index, Finger::Middle, Finger::Ring], thumb_tucked),
        gesture(PRICE, &FINGERS, thumb_up),
        gesture(HOME, &[], thumb_down),
        gesture(THUMBS_UP, &[], thumb_up),
        gesture(VICTORY, &[Finger::Index, Finger::Middle], thumb_tucked),
    ]
}

pub fn builtin_registry() -> Result<DescriptorRegistry, DescriptorError> {
    DescriptorRegistry::new(builtin_descriptors())
}
