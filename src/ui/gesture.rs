/// Minimum travel, in pixels, for a touch to count as a swipe.
pub const SWIPE_THRESHOLD: f64 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gesture {
    /// Toggles all lights.
    SwipeRight,
    /// Activates security mode.
    SwipeLeft,
    /// Opens the chat.
    SwipeUp,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Horizontal and vertical travel are judged independently, so a long
/// diagonal swipe can yield two gestures. Downward swipes are ignored.
pub fn classify(start: Point, end: Point) -> Vec<Gesture> {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let mut gestures = Vec::new();
    if dx.abs() > SWIPE_THRESHOLD {
        gestures.push(if dx > 0.0 { Gesture::SwipeRight } else { Gesture::SwipeLeft });
    }
    if dy.abs() > SWIPE_THRESHOLD && dy < 0.0 {
        gestures.push(Gesture::SwipeUp);
    }
    gestures
}
