//! Generation presets: visual themes, subject genres and output sizes.
//!
//! These tables are the known enumerations that `theme_id`, `genre_id` and
//! `image_size` are checked against when an image is generated. Stored
//! records are never checked against them, so ids removed from these tables
//! still load and round-trip.

use serde::Serialize;

/// Visual style of the generated memo.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub id: &'static str,
    pub name: &'static str,
    pub prompt_description: &'static str,
}

/// Subject domain of the notes. Genres with a `folder_id` get a catalog folder.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Genre {
    pub id: &'static str,
    pub name: &'static str,
    pub prompt_description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<&'static str>,
}

impl Genre {
    /// The catch-all genre adds no subject section to the prompt.
    #[must_use]
    pub fn is_general(&self) -> bool {
        self.id == GENERAL_GENRE_ID
    }
}

/// Id of the catch-all genre.
pub const GENERAL_GENRE_ID: &str = "general";

/// Theme used when an edit's source image has no catalog record.
pub const DEFAULT_THEME_ID: &str = "notebook";

pub const THEMES: &[Theme] = &[
    Theme {
        id: "notebook",
        name: "ノート",
        prompt_description: "a ruled notebook page with slightly off-white paper, faint blue horizontal lines, a red margin line on the left, and handwritten text in dark blue/black ink. Casual, student-like handwriting with some words underlined or circled for emphasis.",
    },
    Theme {
        id: "blackboard",
        name: "黒板",
        prompt_description: "a dark green chalkboard with chalk handwriting in white and pastel colors (yellow, pink, light blue). Include subtle chalk dust and eraser marks for realism. Bold headings, casual chalk lettering style.",
    },
    Theme {
        id: "sticky",
        name: "付箋",
        prompt_description: "a colorful arrangement of sticky notes (yellow, pink, light blue, light green) on a cork board or desk background. Each sticky note has handwritten text in marker pen. Fun, casual, and colorful with slight paper curl effects.",
    },
    Theme {
        id: "whiteboard",
        name: "ホワイトボード",
        prompt_description: "a clean white whiteboard with handwritten text in colorful dry-erase markers (blue, red, green, black). Include arrows, boxes, and underlines drawn by hand. Slightly glossy whiteboard surface with subtle reflections.",
    },
    Theme {
        id: "craft",
        name: "クラフト紙",
        prompt_description: "a brown kraft paper / recycled paper background with handwritten text in black felt-tip pen and colored markers. Warm, cozy, organic feel. Some doodles, stars, or simple illustrations around the text.",
    },
    Theme {
        id: "blueprint",
        name: "青写真",
        prompt_description: "a dark blue blueprint-style background with white handwritten text and diagrams. Technical but approachable feel, with grid lines, arrows, and neat handwritten annotations. Clean and modern.",
    },
];

pub const GENRES: &[Genre] = &[
    Genre {
        id: GENERAL_GENRE_ID,
        name: "指定なし",
        prompt_description: "general study notes",
        folder_id: None,
    },
    Genre {
        id: "toeic",
        name: "TOEIC",
        prompt_description: "TOEIC test preparation study notes, focusing on English vocabulary, grammar, reading comprehension, and listening skills commonly tested in TOEIC",
        folder_id: Some("genre-toeic"),
    },
    Genre {
        id: "fe-exam",
        name: "基本情報技術者",
        prompt_description: "Fundamental Information Technology Engineer Examination (基本情報技術者試験) study notes, covering algorithms, programming, databases, networks, security, and system development commonly tested in the Japanese national IT certification",
        folder_id: Some("genre-fe-exam"),
    },
    Genre {
        id: "takken",
        name: "宅建",
        prompt_description: "Real Estate Transaction Agent (宅地建物取引士) exam study notes, covering civil law, building standards act, urban planning law, real estate registration, and real estate transaction regulations",
        folder_id: Some("genre-takken"),
    },
    Genre {
        id: "denki2",
        name: "第二種電気工事士",
        prompt_description: "Class 2 Electrician (第二種電気工事士) exam study notes, covering electrical theory, wiring methods, electrical equipment, circuit diagrams, and electrical safety regulations",
        folder_id: Some("genre-denki2"),
    },
    Genre {
        id: "bookkeeping",
        name: "簿記",
        prompt_description: "bookkeeping (簿記) exam study notes, covering accounting terminology, journal entries, financial statements, and double-entry bookkeeping concepts",
        folder_id: Some("genre-bookkeeping"),
    },
];

/// Output aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageSize {
    #[default]
    Square,
    Landscape4x3,
    Landscape16x9,
    Portrait3x4,
    Portrait9x16,
}

impl ImageSize {
    pub const ALL: [ImageSize; 5] = [
        ImageSize::Square,
        ImageSize::Landscape4x3,
        ImageSize::Landscape16x9,
        ImageSize::Portrait3x4,
        ImageSize::Portrait9x16,
    ];

    /// Parse the wire id (`"1:1"`, `"16:9"`, ...).
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|size| size.id() == id)
    }

    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Landscape4x3 => "4:3",
            Self::Landscape16x9 => "16:9",
            Self::Portrait3x4 => "3:4",
            Self::Portrait9x16 => "9:16",
        }
    }

    /// Display name for size pickers.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Square => "正方形",
            Self::Landscape4x3 => "横長 4:3",
            Self::Landscape16x9 => "横長 16:9",
            Self::Portrait3x4 => "縦長 3:4",
            Self::Portrait9x16 => "縦長 9:16",
        }
    }

    /// Aspect ratio phrase interpolated into the prompt.
    #[must_use]
    pub fn prompt_description(self) -> &'static str {
        match self {
            Self::Square => "a square (1:1 aspect ratio)",
            Self::Landscape4x3 => "a landscape 4:3 aspect ratio (wider than tall)",
            Self::Landscape16x9 => "a wide landscape 16:9 aspect ratio (much wider than tall)",
            Self::Portrait3x4 => "a portrait 3:4 aspect ratio (taller than wide)",
            Self::Portrait9x16 => "a tall portrait 9:16 aspect ratio (much taller than wide)",
        }
    }
}

#[must_use]
pub fn find_theme(id: &str) -> Option<&'static Theme> {
    THEMES.iter().find(|theme| theme.id == id)
}

#[must_use]
pub fn find_genre(id: &str) -> Option<&'static Genre> {
    GENRES.iter().find(|genre| genre.id == id)
}

/// Genres that own a catalog folder, paired with that folder's id.
pub fn genre_folders() -> impl Iterator<Item = (&'static Genre, &'static str)> {
    GENRES
        .iter()
        .filter_map(|genre| genre.folder_id.map(|folder_id| (genre, folder_id)))
}

/// Serializable view of all presets, for UI selectors.
#[derive(Debug, Serialize)]
pub struct PresetCatalog {
    pub themes: &'static [Theme],
    pub genres: &'static [Genre],
    pub sizes: Vec<SizeOption>,
}

#[derive(Debug, Serialize)]
pub struct SizeOption {
    pub id: &'static str,
    pub name: &'static str,
}

impl PresetCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self {
            themes: THEMES,
            genres: GENRES,
            sizes: ImageSize::ALL
                .into_iter()
                .map(|size| SizeOption {
                    id: size.id(),
                    name: size.name(),
                })
                .collect(),
        }
    }
}

impl Default for PresetCatalog {
    fn default() -> Self {
        Self::new()
    }
}
