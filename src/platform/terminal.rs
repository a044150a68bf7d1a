//! Terminal appearance probe.
//!
//! Queries the terminal background with OSC 11 and classifies it by
//! luminance. Falls back to the `COLORFGBG` convention some terminals export.

use std::io::{IsTerminal, Read, Write};
use std::time::Duration;

use crate::theme::ColorScheme;

/// Timeout for the OSC 11 response (milliseconds).
const OSC_QUERY_TIMEOUT_MS: u64 = 250;

/// What: Best-effort detection of the terminal's light/dark appearance.
///
/// Output:
/// - `Some(ColorScheme)` when either probe succeeds, `None` otherwise.
///
/// Details:
/// - The OSC query only runs when stdin and stdout are terminals.
/// - `COLORFGBG` is consulted when the query fails or is skipped.
#[must_use]
pub fn detect_terminal_scheme() -> Option<ColorScheme> {
    if std::io::stdout().is_terminal()
        && std::io::stdin().is_terminal()
        && let Some((r, g, b)) = query_background()
    {
        let scheme = scheme_from_rgb(r, g, b);
        tracing::debug!(r, g, b, scheme = %scheme, "terminal background detected");
        return Some(scheme);
    }
    let scheme = std::env::var("COLORFGBG")
        .ok()
        .and_then(|v| scheme_from_colorfgbg(&v));
    tracing::debug!(scheme = ?scheme, "terminal appearance from COLORFGBG");
    scheme
}

/// What: Classify a `COLORFGBG` value such as `"15;0"` or `"0;default;15"`.
///
/// Output:
/// - Dark when the background index is 0-6 or 8, light for 7 or 9-15,
///   `None` when it is missing or not a number.
#[must_use]
pub fn scheme_from_colorfgbg(value: &str) -> Option<ColorScheme> {
    let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
    match bg {
        0..=6 | 8 => Some(ColorScheme::Dark),
        7 | 9..=15 => Some(ColorScheme::Light),
        _ => None,
    }
}

/// Dark when relative luminance is below one half.
fn scheme_from_rgb(r: u8, g: u8, b: u8) -> ColorScheme {
    ColorScheme::from_is_dark(luminance(r, g, b) < 0.5)
}

/// Send OSC 11 with the terminal in raw mode and parse the reply.
fn query_background() -> Option<(u8, u8, u8)> {
    use crossterm::terminal::{disable_raw_mode, enable_raw_mode, is_raw_mode_enabled};

    let was_raw_mode = is_raw_mode_enabled().unwrap_or(false);
    if !was_raw_mode && enable_raw_mode().is_err() {
        tracing::debug!("Failed to enable raw mode for OSC query");
        return None;
    }

    let result = (|| {
        let mut stdout = std::io::stdout();
        write!(stdout, "\x1b]11;?\x07").ok()?;
        stdout.flush().ok()?;
        let response = read_with_timeout(Duration::from_millis(OSC_QUERY_TIMEOUT_MS))?;
        parse_osc_background(&response)
    })();

    if !was_raw_mode {
        let _ = disable_raw_mode();
    }
    result
}

/// Read one chunk from stdin, giving up after `timeout`.
///
/// The reader thread is detached on timeout.
fn read_with_timeout(timeout: Duration) -> Option<String> {
    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let mut buffer = [0u8; 256];
        let n = std::io::stdin().read(&mut buffer).unwrap_or(0);
        let _ = tx.send(String::from_utf8_lossy(&buffer[..n]).to_string());
    });
    rx.recv_timeout(timeout).ok()
}

/// Parse `ESC ] 11 ; rgb:RRRR/GGGG/BBBB` terminated by BEL or `ESC \`.
fn parse_osc_background(response: &str) -> Option<(u8, u8, u8)> {
    let start = response.find("]11;")?;
    let after = &response[start + 4..];
    let color = after
        .strip_prefix("rgb:")
        .or_else(|| after.strip_prefix("rgba:"))?;
    let end = color
        .find('\x07')
        .or_else(|| color.find('\x1b'))
        .unwrap_or(color.len());
    let mut parts = color[..end].split('/');
    let r = parse_color_component(parts.next()?)?;
    let g = parse_color_component(parts.next()?)?;
    let b = parse_color_component(parts.next()?)?;
    Some((r, g, b))
}

/// Parse a 2- or 4-digit hex component, keeping the high byte.
fn parse_color_component(s: &str) -> Option<u8> {
    let hex = if s.len() == 4 { s.get(0..2)? } else { s };
    u8::from_str_radix(hex, 16).ok()
}

/// Relative luminance (sRGB, 0.0..=1.0).
fn luminance(r: u8, g: u8, b: u8) -> f32 {
    let r_lin = srgb_to_linear(r);
    let g_lin = srgb_to_linear(g);
    let b_lin = srgb_to_linear(b);
    0.2126f32.mul_add(r_lin, 0.7152f32.mul_add(g_lin, 0.0722 * b_lin))
}

/// sRGB channel to linear light.
fn srgb_to_linear(c: u8) -> f32 {
    let c = f32::from(c) / 255.0;
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}
