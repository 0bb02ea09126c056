//! Static prompt tables.

// ---------------------------------------------------------------------------
// Time of day
// ---------------------------------------------------------------------------

pub const DAWN: &str = "Beautiful serene dawn landscape, soft pink and orange sky, peaceful morning atmosphere, cinematic, 8k, photorealistic";
pub const MORNING: &str = "Bright cheerful morning scene, clear blue sky, vibrant colors, energetic atmosphere, beautiful sunlight, 8k, photorealistic";
pub const AFTERNOON: &str = "Warm afternoon landscape, golden sunlight, peaceful scene, clear skies, vibrant nature, 8k, photorealistic";
pub const EVENING: &str = "Stunning sunset scene, golden hour lighting, warm orange and purple sky, peaceful atmosphere, 8k, photorealistic";
pub const NIGHT: &str = "Beautiful night sky with stars, moonlight, serene nocturnal landscape, deep blues and purples, 8k, photorealistic";
pub const MIDNIGHT: &str = "Mystical midnight scene, starry sky, moonlit landscape, dreamy atmosphere, dark blues and silvers, 8k, photorealistic";

// ---------------------------------------------------------------------------
// Weather
// ---------------------------------------------------------------------------

pub const WEATHER_CLEAR: &str = "Crystal clear sky, beautiful sunny day, vibrant landscape, perfect weather, 8k, photorealistic";
pub const WEATHER_CLOUDY: &str = "Dramatic cloudy sky, moody atmosphere, beautiful cloud formations, scenic landscape, 8k, photorealistic";
pub const WEATHER_RAIN: &str = "Rainy day atmosphere, water droplets, moody sky, cozy rainy scene, beautiful reflections, 8k, photorealistic";
pub const WEATHER_SNOW: &str = "Beautiful snowy landscape, winter wonderland, pristine white snow, peaceful winter scene, 8k, photorealistic";
pub const WEATHER_STORM: &str = "Dramatic storm clouds, powerful weather, lightning in distance, epic atmospheric scene, 8k, photorealistic";
pub const WEATHER_FOG: &str = "Mysterious foggy landscape, ethereal atmosphere, soft diffused light, dreamy scene, 8k, photorealistic";

// ---------------------------------------------------------------------------
// Music mood
// ---------------------------------------------------------------------------

pub const MUSIC_ENERGETIC: &str = "Dynamic energetic abstract art, vibrant neon colors, motion blur, exciting patterns, high energy visualization, 8k, digital art";
pub const MUSIC_CALM: &str = "Peaceful serene abstract patterns, soft pastel colors, flowing shapes, meditative atmosphere, zen-like, 8k, digital art";
pub const MUSIC_INTENSE: &str = "Intense dramatic abstract visualization, bold contrasting colors, sharp geometric patterns, powerful energy, explosive, 8k, digital art";
pub const MUSIC_AMBIENT: &str = "Ethereal ambient visual patterns, soft glowing colors, dreamy atmosphere, flowing organic forms, mystical, 8k, digital art";

// ---------------------------------------------------------------------------
// Gaming
// ---------------------------------------------------------------------------

pub const GAMING_GENERIC: &str = "Ultimate gaming setup, RGB lighting, glowing mechanical keyboard, multiple monitors, immersive atmosphere, neon accents, 8k, digital art";
pub const GAMING_STYLE_STYLIZED: &str = "vibrant stylized art style, bold saturated colors, playful shapes";
pub const GAMING_STYLE_SCIFI: &str = "futuristic sci-fi atmosphere, neon holograms, sleek armor and technology";
pub const GAMING_STYLE_DEFAULT: &str = "cinematic concept art, epic scale, dramatic composition";

/// Lower-case fragments that mark a game as cartoon/stylized.
pub const STYLIZED_KEYWORDS: &[&str] = &[
    "minecraft",
    "fortnite",
    "zelda",
    "genshin",
    "valorant",
    "overwatch",
    "stardew",
    "animal crossing",
    "league of legends",
    "roblox",
];

/// Lower-case fragments that mark a game as science fiction.
pub const SCIFI_KEYWORDS: &[&str] = &[
    "halo",
    "starfield",
    "cyberpunk",
    "mass effect",
    "destiny",
    "doom",
    "apex",
    "no man's sky",
    "warframe",
];

// ---------------------------------------------------------------------------
// Category tables
// ---------------------------------------------------------------------------

pub const AESTHETIC: &[&str] = &[
    "Vaporwave aesthetic, retro 80s vibes, pink and cyan colors, palm trees, geometric shapes, nostalgic, 8k",
    "Minimalist landscape, simple clean design, limited color palette, peaceful composition, modern aesthetic, 8k",
    "Cozy cottagecore aesthetic, wildflowers, rustic cottage, warm sunlight, peaceful countryside, vintage feel, 8k",
    "Dark academia aesthetic, vintage library, moody atmosphere, warm candlelight, books and knowledge, classical, 8k",
    "Synthwave aesthetic, neon sunset, retro futuristic, grid patterns, purple and pink gradient, 80s vibes, 8k",
];

pub const NATURE: &[&str] = &[
    "Mystical forest scene, sunbeams through trees, lush greenery, peaceful woodland path, magical atmosphere, 8k, photorealistic",
    "Serene ocean view, crystal clear waters, tropical beach, gentle waves, paradise setting, stunning colors, 8k, photorealistic",
    "Majestic mountain landscape, dramatic peaks, alpine scenery, pristine wilderness, breathtaking vista, 8k, photorealistic",
    "Beautiful desert landscape, sand dunes, warm golden light, vast open space, dramatic sky, 8k, photorealistic",
    "Northern lights display, dancing aurora borealis, starry night sky, magical atmosphere, vivid colors, 8k, photorealistic",
];

pub const SPACE: &[&str] = &[
    "Colorful space nebula, cosmic clouds, stars and galaxies, vibrant colors, deep space photography, 8k",
    "Alien planet landscape, multiple moons in sky, sci-fi scenery, otherworldly atmosphere, cinematic, 8k",
    "Spiral galaxy, millions of stars, cosmic beauty, deep space view, astronomical wonder, 8k",
    "Black hole visualization, event horizon, gravitational lensing, cosmic phenomenon, scientific beauty, 8k",
    "Starfield panorama, milky way galaxy, countless stars, cosmic perspective, night sky magnificence, 8k",
];

pub const ABSTRACT: &[&str] = &[
    "Fluid art, flowing colors, marble texture, organic patterns, liquid dynamics, vibrant swirls, ultra detailed, sharp focus, 8k uhd, digital art masterpiece",
    "Geometric abstract art, sharp angles, bold shapes, modern design, colorful composition, ultra detailed, sharp focus, 8k uhd, digital art, award winning",
    "Fractal patterns, mathematical beauty, infinite detail, psychedelic colors, mesmerizing design, ultra detailed, sharp focus, 8k uhd, digital art masterpiece",
    "Abstract watercolor art, soft blending, dreamy colors, artistic expression, flowing paint, ultra detailed, sharp focus, 8k uhd, digital art, professional",
    "Glitch art aesthetic, digital corruption, vibrant color distortion, cybernetic patterns, modern digital art, ultra detailed, sharp focus, 8k uhd, masterpiece",
];

pub const CYBERPUNK: &[&str] = &[
    "Cyberpunk city night, neon lights, rain-soaked streets, futuristic buildings, blade runner atmosphere, 8k, cinematic",
    "Cyberpunk technology, holographic interfaces, neon circuitry, futuristic tech, sci-fi aesthetic, 8k, digital art",
    "Dark cyberpunk alley, moody atmosphere, neon signs, urban dystopia, gritty futuristic, 8k, cinematic",
];

pub const FANTASY: &[&str] = &[
    "Fantasy castle, magical kingdom, dramatic clouds, enchanted atmosphere, epic fantasy landscape, 8k, digital art",
    "Majestic dragon flying, epic fantasy scene, magical atmosphere, dramatic lighting, mythical creature, 8k, digital art",
    "Enchanted forest, magical glowing plants, fairy lights, mystical atmosphere, fantasy wonderland, 8k, digital art",
    "Magical portal, swirling energy, fantasy gateway, mystical doorway, otherworldly magic, 8k, digital art",
];

// ---------------------------------------------------------------------------
// Variation augmentation
// ---------------------------------------------------------------------------

pub const QUALITY_DESCRIPTORS: &[&str] = &[
    "stunning",
    "breathtaking",
    "magnificent",
    "spectacular",
    "gorgeous",
    "beautiful",
    "amazing",
    "incredible",
    "mesmerizing",
    "captivating",
    "detailed",
    "ultra-detailed",
    "highly detailed",
    "intricate",
    "vivid",
    "vibrant",
    "rich",
    "dynamic",
    "atmospheric",
];

pub const LIGHTING_DESCRIPTORS: &[&str] = &[
    "perfect lighting",
    "dramatic lighting",
    "cinematic lighting",
    "natural lighting",
    "soft lighting",
    "volumetric lighting",
    "studio lighting",
    "golden hour",
    "blue hour",
];
