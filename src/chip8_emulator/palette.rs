use std::env;

/// Foreground/background colours as 0xRRGGBB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub name: &'static str,
    pub on: u32,
    pub off: u32,
}

impl Palette {
    pub fn on_rgb(&self) -> (u8, u8, u8) {
        split_rgb(self.on)
    }

    pub fn off_rgb(&self) -> (u8, u8, u8) {
        split_rgb(self.off)
    }
}

fn split_rgb(color: u32) -> (u8, u8, u8) {
    (
        ((color >> 16) & 0xFF) as u8,
        ((color >> 8) & 0xFF) as u8,
        (color & 0xFF) as u8,
    )
}

pub const BW_PALETTE: Palette = Palette {
    name: "bw",
    on: 0xFFFFFF,
    off: 0x000000,
};

pub const AMBER_PALETTE: Palette = Palette {
    name: "amber",
    on: 0xFFB000,
    off: 0x2A1C00,
};

/// Indexed by the F1/F2 hotkeys.
pub const PALETTES: [Palette; 2] = [BW_PALETTE, AMBER_PALETTE];

pub fn load_palette(name: &str) -> Result<Palette, String> {
    let normalized = name.trim().to_ascii_lowercase();
    PALETTES
        .iter()
        .find(|palette| palette.name == normalized)
        .copied()
        .ok_or_else(|| format!("invalid palette '{normalized}', expected one of: bw, amber"))
}

pub fn load_palette_from_env() -> Result<Palette, String> {
    let name = env::var("CHIP8_PALETTE").unwrap_or_else(|_| BW_PALETTE.name.to_owned());
    load_palette(&name)
}
