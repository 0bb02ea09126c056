//! Prompt selection.
//!
//! Maps a [`Mode`] plus whatever context the collaborators managed to gather
//! to a prompt string. Selection never fails: every branch ends in a static
//! template when its context is missing.

pub mod templates;

use std::fmt;
use std::str::FromStr;

use rand::RngExt;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// Category tag selecting the prompt strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    #[serde(rename = "time_based", alias = "time")]
    Time,
    #[serde(rename = "weather_based", alias = "weather")]
    Weather,
    #[serde(rename = "music_based", alias = "music")]
    Music,
    #[serde(rename = "gaming")]
    Gaming,
    #[serde(rename = "aesthetic")]
    Aesthetic,
    #[serde(rename = "nature")]
    Nature,
    #[serde(rename = "space")]
    Space,
    #[serde(rename = "abstract")]
    Abstract,
    #[serde(rename = "cyberpunk")]
    Cyberpunk,
    #[serde(rename = "fantasy")]
    Fantasy,
    #[serde(rename = "manual")]
    Manual,
}

impl Mode {
    pub const ALL: [Mode; 11] = [
        Mode::Time,
        Mode::Weather,
        Mode::Music,
        Mode::Gaming,
        Mode::Aesthetic,
        Mode::Nature,
        Mode::Space,
        Mode::Abstract,
        Mode::Cyberpunk,
        Mode::Fantasy,
        Mode::Manual,
    ];

    /// Persisted tag.
    pub fn key(self) -> &'static str {
        match self {
            Mode::Time => "time_based",
            Mode::Weather => "weather_based",
            Mode::Music => "music_based",
            Mode::Gaming => "gaming",
            Mode::Aesthetic => "aesthetic",
            Mode::Nature => "nature",
            Mode::Space => "space",
            Mode::Abstract => "abstract",
            Mode::Cyberpunk => "cyberpunk",
            Mode::Fantasy => "fantasy",
            Mode::Manual => "manual",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Time => "Time of Day",
            Mode::Weather => "Weather Reactive",
            Mode::Music => "Music Reactive",
            Mode::Gaming => "Game Sense",
            Mode::Aesthetic => "Aesthetic Vibe",
            Mode::Nature => "Nature Focus",
            Mode::Space => "Space & Cosmos",
            Mode::Abstract => "Abstract Art",
            Mode::Cyberpunk => "Cyberpunk",
            Mode::Fantasy => "Fantasy World",
            Mode::Manual => "Manual Mode",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Mode::Time => "Wallpapers matching your local time and sun position.",
            Mode::Weather => "Reacts to your local weather: sunny, rainy, or stormy visuals.",
            Mode::Music => "Turns the energy of your music into abstract art.",
            Mode::Gaming => "Detects running games and adapts the theme to match.",
            Mode::Aesthetic => "Vaporwave, synthwave, and modern aesthetic art styles.",
            Mode::Nature => "Serene landscapes, forests, and natural wonders.",
            Mode::Space => "Nebulas, galaxies, and the deep mysteries of the universe.",
            Mode::Abstract => "Digital patterns, shapes, and abstract compositions.",
            Mode::Cyberpunk => "Neon-lit futuristic cityscapes and high-tech dystopias.",
            Mode::Fantasy => "Magical worlds, mythical creatures, and epic scenes.",
            Mode::Manual => "Your own prompt, used as typed.",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "time" | "time_based" => Ok(Mode::Time),
            "weather" | "weather_based" => Ok(Mode::Weather),
            "music" | "music_based" => Ok(Mode::Music),
            "gaming" | "game" => Ok(Mode::Gaming),
            "aesthetic" => Ok(Mode::Aesthetic),
            "nature" => Ok(Mode::Nature),
            "space" => Ok(Mode::Space),
            "abstract" => Ok(Mode::Abstract),
            "cyberpunk" => Ok(Mode::Cyberpunk),
            "fantasy" => Ok(Mode::Fantasy),
            "manual" => Ok(Mode::Manual),
            other => Err(format!("unknown mode: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Signals gathered (best effort) before selecting a prompt.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PromptContext {
    /// Local hour, 0-23.
    pub hour: Option<u32>,
    /// Free-text weather description, e.g. "Partly cloudy +12°C".
    pub weather: Option<String>,
    /// Label of a detected running game.
    pub game: Option<String>,
    /// Music energy in `[0, 1]`.
    pub music_energy: Option<f32>,
    /// User text for manual mode.
    pub custom: Option<String>,
}

// ---------------------------------------------------------------------------
// Buckets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimePeriod {
    Dawn,
    Morning,
    Afternoon,
    Evening,
    Night,
    Midnight,
}

impl TimePeriod {
    /// Midnight is the catch-all for 23:00-04:59 and any out-of-range hour.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=6 => TimePeriod::Dawn,
            7..=11 => TimePeriod::Morning,
            12..=16 => TimePeriod::Afternoon,
            17..=19 => TimePeriod::Evening,
            20..=22 => TimePeriod::Night,
            _ => TimePeriod::Midnight,
        }
    }

    pub fn prompt(self) -> &'static str {
        match self {
            TimePeriod::Dawn => templates::DAWN,
            TimePeriod::Morning => templates::MORNING,
            TimePeriod::Afternoon => templates::AFTERNOON,
            TimePeriod::Evening => templates::EVENING,
            TimePeriod::Night => templates::NIGHT,
            TimePeriod::Midnight => templates::MIDNIGHT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherCondition {
    Clear,
    Rain,
    Snow,
    Storm,
    Fog,
    Cloudy,
}

/// Keyword sets in match priority order.
const WEATHER_KEYWORDS: &[(WeatherCondition, &[&str])] = &[
    (WeatherCondition::Clear, &["clear", "sunny", "fair"]),
    (WeatherCondition::Rain, &["rain", "drizzle", "shower"]),
    (WeatherCondition::Snow, &["snow", "sleet", "ice"]),
    (WeatherCondition::Storm, &["storm", "thunder", "lightning"]),
    (WeatherCondition::Fog, &["fog", "mist", "haze"]),
    (WeatherCondition::Cloudy, &["cloud", "overcast", "partly"]),
];

impl WeatherCondition {
    /// First matching keyword set wins; no match (or no text) is `Clear`.
    pub fn parse(text: Option<&str>) -> Self {
        let Some(text) = text else {
            return WeatherCondition::Clear;
        };
        let lower = text.to_lowercase();
        WEATHER_KEYWORDS
            .iter()
            .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
            .map_or(WeatherCondition::Clear, |(condition, _)| *condition)
    }

    pub fn prompt(self) -> &'static str {
        match self {
            WeatherCondition::Clear => templates::WEATHER_CLEAR,
            WeatherCondition::Rain => templates::WEATHER_RAIN,
            WeatherCondition::Snow => templates::WEATHER_SNOW,
            WeatherCondition::Storm => templates::WEATHER_STORM,
            WeatherCondition::Fog => templates::WEATHER_FOG,
            WeatherCondition::Cloudy => templates::WEATHER_CLOUDY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicMood {
    Calm,
    Ambient,
    Energetic,
    Intense,
}

/// Energy used when no audio source is available.
pub const NEUTRAL_ENERGY: f32 = 0.5;

impl MusicMood {
    pub fn from_energy(energy: f32) -> Self {
        if energy < 0.2 {
            MusicMood::Calm
        } else if energy < 0.4 {
            MusicMood::Ambient
        } else if energy < 0.7 {
            MusicMood::Energetic
        } else {
            MusicMood::Intense
        }
    }

    pub fn prompt(self) -> &'static str {
        match self {
            MusicMood::Calm => templates::MUSIC_CALM,
            MusicMood::Ambient => templates::MUSIC_AMBIENT,
            MusicMood::Energetic => templates::MUSIC_ENERGETIC,
            MusicMood::Intense => templates::MUSIC_INTENSE,
        }
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Pick a prompt for `mode`. Always returns a non-empty string.
pub fn select(mode: Mode, context: &PromptContext) -> String {
    let time_prompt = || {
        let hour = context.hour.unwrap_or_else(current_hour);
        TimePeriod::from_hour(hour).prompt().to_string()
    };

    match mode {
        Mode::Time => time_prompt(),
        Mode::Weather => WeatherCondition::parse(context.weather.as_deref())
            .prompt()
            .to_string(),
        Mode::Music => MusicMood::from_energy(context.music_energy.unwrap_or(NEUTRAL_ENERGY))
            .prompt()
            .to_string(),
        Mode::Gaming => gaming_prompt(context.game.as_deref()),
        Mode::Aesthetic => pick(templates::AESTHETIC).to_string(),
        Mode::Nature => pick(templates::NATURE).to_string(),
        Mode::Space => pick(templates::SPACE).to_string(),
        Mode::Abstract => pick(templates::ABSTRACT).to_string(),
        Mode::Cyberpunk => pick(templates::CYBERPUNK).to_string(),
        Mode::Fantasy => pick(templates::FANTASY).to_string(),
        Mode::Manual => match context.custom.as_deref() {
            Some(text) if !text.trim().is_empty() => text.to_string(),
            _ => time_prompt(),
        },
    }
}

/// Build a prompt around a detected game, or a generic gaming scene.
pub fn gaming_prompt(game: Option<&str>) -> String {
    let Some(game) = game.map(str::trim).filter(|g| !g.is_empty()) else {
        return templates::GAMING_GENERIC.to_string();
    };

    let lower = game.to_lowercase();
    let style = if templates::STYLIZED_KEYWORDS
        .iter()
        .any(|k| lower.contains(k))
    {
        templates::GAMING_STYLE_STYLIZED
    } else if templates::SCIFI_KEYWORDS.iter().any(|k| lower.contains(k)) {
        templates::GAMING_STYLE_SCIFI
    } else {
        templates::GAMING_STYLE_DEFAULT
    };

    format!("{game} inspired wallpaper, iconic scenery from the game, {style}, dramatic lighting, 8k, digital art")
}

/// Prepend one or two quality descriptors and append a lighting descriptor.
pub fn add_variation(prompt: &str) -> String {
    let mut rng = rand::rng();

    let pool = templates::QUALITY_DESCRIPTORS;
    let first = rng.random_range(0..pool.len());
    let mut descriptors = vec![pool[first]];
    if rng.random_range(1..=2) == 2 {
        // Draw the second from the remaining entries so both differ.
        let offset = rng.random_range(1..pool.len());
        descriptors.push(pool[(first + offset) % pool.len()]);
    }

    let light = pick(templates::LIGHTING_DESCRIPTORS);
    let varied = format!("{}, {prompt}, {light}", descriptors.join(", "));
    tracing::debug!(original = %prompt, varied = %varied, "prompt variation applied");
    varied
}

fn pick(table: &'static [&'static str]) -> &'static str {
    table[rand::rng().random_range(0..table.len())]
}

fn current_hour() -> u32 {
    use chrono::Timelike;
    chrono::Local::now().hour()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn at_hour(hour: u32) -> PromptContext {
        PromptContext {
            hour: Some(hour),
            ..Default::default()
        }
    }

    #[test]
    fn every_hour_maps_to_one_time_template() {
        let all = [
            templates::DAWN,
            templates::MORNING,
            templates::AFTERNOON,
            templates::EVENING,
            templates::NIGHT,
            templates::MIDNIGHT,
        ];
        for hour in 0..24 {
            let prompt = select(Mode::Time, &at_hour(hour));
            assert_eq!(all.iter().filter(|t| **t == prompt).count(), 1, "hour {hour}");
        }
    }

    #[test]
    fn time_bucket_boundaries() {
        assert_eq!(TimePeriod::from_hour(4), TimePeriod::Midnight);
        assert_eq!(TimePeriod::from_hour(5), TimePeriod::Dawn);
        assert_eq!(TimePeriod::from_hour(6), TimePeriod::Dawn);
        assert_eq!(TimePeriod::from_hour(7), TimePeriod::Morning);
        assert_eq!(TimePeriod::from_hour(11), TimePeriod::Morning);
        assert_eq!(TimePeriod::from_hour(12), TimePeriod::Afternoon);
        assert_eq!(TimePeriod::from_hour(16), TimePeriod::Afternoon);
        assert_eq!(TimePeriod::from_hour(17), TimePeriod::Evening);
        assert_eq!(TimePeriod::from_hour(19), TimePeriod::Evening);
        assert_eq!(TimePeriod::from_hour(20), TimePeriod::Night);
        assert_eq!(TimePeriod::from_hour(22), TimePeriod::Night);
        assert_eq!(TimePeriod::from_hour(23), TimePeriod::Midnight);
        assert_eq!(TimePeriod::from_hour(0), TimePeriod::Midnight);
    }

    #[test]
    fn weather_single_keyword_matches_its_condition() {
        let cases = [
            ("Sunny", WeatherCondition::Clear),
            ("Fair", WeatherCondition::Clear),
            ("Light drizzle", WeatherCondition::Rain),
            ("Patchy rain nearby", WeatherCondition::Rain),
            ("Heavy snow", WeatherCondition::Snow),
            ("Sleet", WeatherCondition::Snow),
            ("Thundery outbreaks", WeatherCondition::Storm),
            ("Lightning", WeatherCondition::Storm),
            ("Mist", WeatherCondition::Fog),
            ("Haze", WeatherCondition::Fog),
            ("Overcast", WeatherCondition::Cloudy),
            ("Partly cloudy +12°C", WeatherCondition::Cloudy),
        ];
        for (text, expected) in cases {
            assert_eq!(WeatherCondition::parse(Some(text)), expected, "{text}");
        }
    }

    #[test]
    fn weather_priority_and_default() {
        // Rain is checked before storm.
        assert_eq!(
            WeatherCondition::parse(Some("Thunderstorm with rain")),
            WeatherCondition::Rain
        );
        // Clear is checked before cloudy.
        assert_eq!(
            WeatherCondition::parse(Some("clear with a few clouds")),
            WeatherCondition::Clear
        );
        assert_eq!(WeatherCondition::parse(Some("???")), WeatherCondition::Clear);
        assert_eq!(WeatherCondition::parse(None), WeatherCondition::Clear);
        assert_eq!(WeatherCondition::parse(Some("")), WeatherCondition::Clear);
    }

    #[test]
    fn weather_mode_uses_condition_template() {
        let ctx = PromptContext {
            weather: Some("Moderate or heavy snow".into()),
            ..Default::default()
        };
        assert_eq!(select(Mode::Weather, &ctx), templates::WEATHER_SNOW);
        assert_eq!(
            select(Mode::Weather, &PromptContext::default()),
            templates::WEATHER_CLEAR
        );
    }

    #[test]
    fn music_energy_buckets() {
        assert_eq!(MusicMood::from_energy(0.0), MusicMood::Calm);
        assert_eq!(MusicMood::from_energy(0.2), MusicMood::Ambient);
        assert_eq!(MusicMood::from_energy(0.5), MusicMood::Energetic);
        assert_eq!(MusicMood::from_energy(0.7), MusicMood::Intense);
        assert_eq!(
            select(Mode::Music, &PromptContext::default()),
            templates::MUSIC_ENERGETIC
        );
    }

    #[test]
    fn gaming_prompt_styles() {
        let stylized = gaming_prompt(Some("Minecraft"));
        assert!(stylized.starts_with("Minecraft inspired"));
        assert!(stylized.contains(templates::GAMING_STYLE_STYLIZED));

        let scifi = gaming_prompt(Some("Halo Infinite"));
        assert!(scifi.contains(templates::GAMING_STYLE_SCIFI));

        let other = gaming_prompt(Some("Elden Ring"));
        assert!(other.contains(templates::GAMING_STYLE_DEFAULT));

        assert_eq!(gaming_prompt(None), templates::GAMING_GENERIC);
        assert_eq!(gaming_prompt(Some("  ")), templates::GAMING_GENERIC);
    }

    #[test]
    fn category_modes_draw_from_their_table() {
        let tables: [(Mode, &[&str]); 6] = [
            (Mode::Aesthetic, templates::AESTHETIC),
            (Mode::Nature, templates::NATURE),
            (Mode::Space, templates::SPACE),
            (Mode::Abstract, templates::ABSTRACT),
            (Mode::Cyberpunk, templates::CYBERPUNK),
            (Mode::Fantasy, templates::FANTASY),
        ];
        for (mode, table) in tables {
            for _ in 0..20 {
                let prompt = select(mode, &PromptContext::default());
                assert!(table.contains(&prompt.as_str()), "{mode}: {prompt}");
            }
        }
    }

    #[test]
    fn manual_returns_text_unchanged() {
        let ctx = PromptContext {
            custom: Some("a lighthouse made of glass".into()),
            hour: Some(9),
            ..Default::default()
        };
        assert_eq!(select(Mode::Manual, &ctx), "a lighthouse made of glass");
    }

    #[test]
    fn manual_without_text_falls_back_to_time() {
        let ctx = PromptContext {
            custom: Some("   ".into()),
            hour: Some(9),
            ..Default::default()
        };
        assert_eq!(select(Mode::Manual, &ctx), templates::MORNING);
    }

    #[test]
    fn selection_is_never_empty() {
        for mode in Mode::ALL {
            assert!(!select(mode, &PromptContext::default()).is_empty(), "{mode}");
        }
    }

    #[test]
    fn variation_wraps_prompt() {
        for _ in 0..50 {
            let varied = add_variation("calm lake");
            let parts: Vec<&str> = varied.split(", ").collect();
            let idx = parts.iter().position(|p| *p == "calm lake").unwrap();
            assert!(idx == 1 || idx == 2, "{varied}");
            for d in &parts[..idx] {
                assert!(templates::QUALITY_DESCRIPTORS.contains(d), "{d}");
            }
            if idx == 2 {
                assert_ne!(parts[0], parts[1]);
            }
            assert_eq!(idx + 2, parts.len());
            assert!(templates::LIGHTING_DESCRIPTORS.contains(parts.last().unwrap()));
        }
    }

    #[test]
    fn mode_round_trips_through_tags() {
        for mode in Mode::ALL {
            assert_eq!(mode.key().parse::<Mode>().unwrap(), mode);
            let json = serde_json::to_string(&mode).unwrap();
            assert_eq!(json, format!("\"{}\"", mode.key()));
        }
        assert_eq!("weather".parse::<Mode>().unwrap(), Mode::Weather);
        let short: Mode = serde_json::from_str("\"music\"").unwrap();
        assert_eq!(short, Mode::Music);
        assert!("disco".parse::<Mode>().is_err());
    }
}
