//! Sector themes - colour palette per level

/// Palette and name for a sector. Colours are 0xRRGGBB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectorTheme {
    pub enemy: u32,
    pub grid: u32,
    pub name: &'static str,
}

const THEMES: [SectorTheme; 10] = [
    SectorTheme { enemy: 0xff3366, grid: 0x05120a, name: "NEON" },
    SectorTheme { enemy: 0x00ccff, grid: 0x050a12, name: "CYBER" },
    SectorTheme { enemy: 0xbf00ff, grid: 0x0a0512, name: "VOID" },
    SectorTheme { enemy: 0xff9900, grid: 0x120a05, name: "PLASMA" },
    SectorTheme { enemy: 0xffffff, grid: 0x0f0f0f, name: "CHROME" },
    SectorTheme { enemy: 0x00ff88, grid: 0x0a1205, name: "TOXIC" },
    SectorTheme { enemy: 0xffcc00, grid: 0x121205, name: "GOLD" },
    SectorTheme { enemy: 0x33ffcc, grid: 0x051212, name: "TEAL" },
    SectorTheme { enemy: 0xff5500, grid: 0x120500, name: "EMBER" },
    SectorTheme { enemy: 0xff0000, grid: 0x1a0000, name: "CORE" },
];

/// Theme for a 1-based level; levels past the table reuse the last entry
pub fn sector_theme(level: u32) -> SectorTheme {
    let idx = (level.max(1) as usize - 1).min(THEMES.len() - 1);
    THEMES[idx]
}
