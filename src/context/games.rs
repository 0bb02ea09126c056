use sysinfo::{ProcessesToUpdate, System};

/// Executable stem (lowercase, no `.exe`) and display label.
pub const KNOWN_GAMES: &[(&str, &str)] = &[
    ("minecraft", "Minecraft"),
    ("javaw", "Minecraft"),
    ("fortniteclient-win64-shipping", "Fortnite"),
    ("valorant-win64-shipping", "Valorant"),
    ("overwatch", "Overwatch"),
    ("genshinimpact", "Genshin Impact"),
    ("stardew valley", "Stardew Valley"),
    ("stardewvalley", "Stardew Valley"),
    ("cyberpunk2077", "Cyberpunk 2077"),
    ("starfield", "Starfield"),
    ("halo infinite", "Halo Infinite"),
    ("haloinfinite", "Halo Infinite"),
    ("destiny2", "Destiny 2"),
    ("doometernalx64vk", "Doom Eternal"),
    ("r5apex", "Apex Legends"),
    ("nms", "No Man's Sky"),
    ("warframe.x64", "Warframe"),
    ("masseffectlauncher", "Mass Effect"),
    ("eldenring", "Elden Ring"),
    ("witcher3", "The Witcher 3"),
    ("rdr2", "Red Dead Redemption 2"),
    ("gta5", "Grand Theft Auto V"),
    ("cs2", "Counter-Strike 2"),
    ("league of legends", "League of Legends"),
    ("dota2", "Dota 2"),
    ("rocketleague", "Rocket League"),
    ("bg3", "Baldur's Gate 3"),
];

fn normalize(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    match lower.strip_suffix(".exe") {
        Some(stem) => stem.to_string(),
        None => lower,
    }
}

/// Label of the first known game (in table order) among `process_names`.
pub fn match_game<'a>(process_names: impl IntoIterator<Item = &'a str>) -> Option<&'static str> {
    let running: Vec<String> = process_names.into_iter().map(normalize).collect();
    KNOWN_GAMES
        .iter()
        .find(|(exe, _)| running.iter().any(|name| name == exe))
        .map(|(_, label)| *label)
}

/// Enumerate running processes. Blocking; call from `spawn_blocking`.
pub fn detect_running_game() -> Option<String> {
    let mut sys = System::new();
    sys.refresh_processes(ProcessesToUpdate::All, true);

    let names: Vec<String> = sys
        .processes()
        .values()
        .map(|p| p.name().to_string_lossy().into_owned())
        .collect();

    let game = match_game(names.iter().map(String::as_str));
    tracing::debug!(processes = names.len(), ?game, "game detection");
    game.map(str::to_string)
}
