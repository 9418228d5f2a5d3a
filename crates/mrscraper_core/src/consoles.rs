/// Console directories offered for selection. Each label doubles as the
/// listing path segment under `NO_INTRO_ROOT`.
pub const CONSOLES: &[&str] = &[
    "Atari - 2600",
    "Atari - 5200",
    "Atari - 7800",
    "Atari - Jaguar (J64)",
    "Atari - Lynx (LNX)",
    "Bandai - WonderSwan",
    "Bandai - WonderSwan Color",
    "Coleco - ColecoVision",
    "GCE - Vectrex",
    "Mattel - Intellivision",
    "NEC - PC Engine - TurboGrafx-16",
    "Nintendo - Family Computer Disk System (FDS)",
    "Nintendo - Game Boy",
    "Nintendo - Game Boy Advance",
    "Nintendo - Game Boy Color",
    "Nintendo - Nintendo 64 (BigEndian)",
    "Nintendo - Nintendo DS (Decrypted)",
    "Nintendo - Nintendo Entertainment System (Headered)",
    "Nintendo - Pokemon Mini",
    "Nintendo - Super Nintendo Entertainment System",
    "Nintendo - Virtual Boy",
    "SNK - NeoGeo Pocket",
    "SNK - NeoGeo Pocket Color",
    "Sega - 32X",
    "Sega - Game Gear",
    "Sega - Master System - Mark III",
    "Sega - Mega Drive - Genesis",
    "Sega - SG-1000",
];

/// Region tags offered for selection. "World only" matches no release name,
/// so with it selected only region-free releases pass the filter.
pub const REGIONS: &[&str] = &[
    "Europe",
    "USA",
    "Japan",
    "China",
    "Korea",
    "Australia",
    "Asia",
    "World only",
];

pub const DEFAULT_REGION: &str = "Europe";

/// Case-insensitive lookup returning the canonical label.
pub fn find_console(label: &str) -> Option<&'static str> {
    let wanted = label.trim();
    CONSOLES
        .iter()
        .copied()
        .find(|console| console.eq_ignore_ascii_case(wanted))
}
