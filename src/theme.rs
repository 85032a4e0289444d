use ratatui::style::Color;

// The shell's palette is defined the way the device display stores colors:
// packed 5-6-5 RGB. `to_color` widens a packed value for the terminal and
// falls back to the xterm-256 cube when truecolor is unavailable.

pub const fn rgb565(r: u8, g: u8, b: u8) -> u16 {
    (((r & 0xf8) as u16) << 8) | (((g & 0xfc) as u16) << 3) | ((b as u16) >> 3)
}

pub const CODE: u16 = rgb565(200, 200, 200);
pub const LINE: u16 = rgb565(90, 90, 90);
pub const HEADER: u16 = rgb565(160, 160, 160);
pub const BORDER: u16 = rgb565(63, 40, 0);
pub const BACKGROUND: u16 = rgb565(10, 10, 10);
pub const BACKGROUND_ALT: u16 = rgb565(50, 50, 20);
pub const CURSOR: u16 = rgb565(160, 60, 0);
pub const HIGHLIGHT: u16 = rgb565(10, 110, 10);

/// Expand a packed color back to 8-bit channels.
pub const fn widen(packed: u16) -> (u8, u8, u8) {
    let r5 = (packed >> 11) & 0x1f;
    let g6 = (packed >> 5) & 0x3f;
    let b5 = packed & 0x1f;
    (
        ((r5 << 3) | (r5 >> 2)) as u8,
        ((g6 << 2) | (g6 >> 4)) as u8,
        ((b5 << 3) | (b5 >> 2)) as u8,
    )
}

fn truecolor() -> bool {
    std::env::var("COLORTERM")
        .map(|v| {
            let v = v.to_lowercase();
            v.contains("truecolor") || v.contains("24bit")
        })
        .unwrap_or(false)
}

pub fn to_color(packed: u16) -> Color {
    let (r, g, b) = widen(packed);
    if truecolor() {
        Color::Rgb(r, g, b)
    } else {
        let level = |c: u8| (c as u16 * 5 + 127) / 255;
        Color::Indexed((16 + 36 * level(r) + 6 * level(g) + level(b)) as u8)
    }
}

pub fn code_fg() -> Color {
    to_color(CODE)
}

pub fn line_fg() -> Color {
    to_color(LINE)
}

pub fn header_fg() -> Color {
    to_color(HEADER)
}

pub fn header_bg() -> Color {
    to_color(BACKGROUND_ALT)
}

pub fn border() -> Color {
    to_color(BORDER)
}

pub fn bg() -> Color {
    to_color(BACKGROUND)
}

pub fn cursor_bg() -> Color {
    to_color(CURSOR)
}

pub fn highlight_bg() -> Color {
    to_color(HIGHLIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packing_matches_device_layout() {
        assert_eq!(rgb565(0xff, 0xff, 0xff), 0xffff);
        assert_eq!(rgb565(0, 0, 0), 0);
        assert_eq!(rgb565(0xf8, 0, 0), 0xf800);
    }

    #[test]
    fn widen_restores_full_range() {
        assert_eq!(widen(0xffff), (255, 255, 255));
        assert_eq!(widen(0), (0, 0, 0));
        let (r, g, b) = widen(CURSOR);
        assert!(r > g && g > b);
    }

    #[test]
    fn colors_are_concrete() {
        match cursor_bg() {
            Color::Rgb(_, _, _) | Color::Indexed(_) => {}
            other => panic!("unexpected color {other:?}"),
        }
    }
}
