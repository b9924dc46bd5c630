//! Panel geometry: icon sizing and popup placement.

use serde::{Deserialize, Serialize};

/// Allocations below this are transient and ignored.
pub const MIN_ALLOCATION: u32 = 10;

/// Direction in which the panel opens popups.
///
/// `Up` is a panel along the bottom edge of the screen, `Down` one along the
/// top, `Left` and `Right` are vertical panels on the right and left edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Up,
    Down,
    Left,
    Right,
}

impl Orientation {
    pub fn is_horizontal_panel(&self) -> bool {
        matches!(self, Orientation::Up | Orientation::Down)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// The panel extent that constrains the icon: height on horizontal panels,
/// width on vertical ones.
pub fn panel_extent(allocation: Size, orientation: Orientation) -> u32 {
    if orientation.is_horizontal_panel() {
        allocation.height
    } else {
        allocation.width
    }
}

/// Largest stock icon size that fits `extent`.
pub fn icon_size_for(extent: u32) -> u32 {
    match extent {
        0..22 => 16,
        22..24 => 22,
        24..32 => 24,
        32..48 => 32,
        _ => 48,
    }
}

/// Places a popup of `menu` size next to an applet at `origin`.
///
/// The popup opens in the panel's direction and is then pulled back so it
/// stays on screen.
pub fn popup_position(
    origin: Point,
    allocation: Size,
    menu: Size,
    screen: Size,
    orientation: Orientation,
) -> Point {
    let Point { mut x, mut y } = origin;
    match orientation {
        Orientation::Up => y -= menu.height as i32,
        Orientation::Down => y += allocation.height as i32,
        Orientation::Left => x -= menu.width as i32,
        Orientation::Right => x += allocation.width as i32,
    }

    let max_x = screen.width as i32 - menu.width as i32 - 1;
    let max_y = screen.height as i32 - menu.height as i32 - 1;
    Point::new(x.min(max_x).max(0), y.min(max_y).max(0))
}
