//! Public site content models (news, events, projects, downloads, about)

use serde::{Deserialize, Serialize};

// ── News ──

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct News {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub summary: Option<String>,
    pub content: String,
    pub image_url: Option<String>,
    pub published: bool,
    /// Set the first time the article is published
    pub published_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsCreate {
    pub title: String,
    /// Derived from the title when omitted
    pub slug: Option<String>,
    pub summary: Option<String>,
    pub content: String,
    pub image_url: Option<String>,
    #[serde(default)]
    pub published: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsUpdate {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub published: Option<bool>,
}

// ── Events ──

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: i64,
    pub ends_at: Option<i64>,
    pub image_url: Option<String>,
    pub published: bool,
    pub display_order: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventCreate {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: i64,
    pub ends_at: Option<i64>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub published: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: Option<i64>,
    pub ends_at: Option<i64>,
    pub image_url: Option<String>,
    pub published: Option<bool>,
}

// ── Projects ──

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub partner: Option<String>,
    pub image_url: Option<String>,
    pub link_url: Option<String>,
    pub active: bool,
    pub display_order: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectCreate {
    pub title: String,
    pub description: Option<String>,
    pub partner: Option<String>,
    pub image_url: Option<String>,
    pub link_url: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub partner: Option<String>,
    pub image_url: Option<String>,
    pub link_url: Option<String>,
    pub active: Option<bool>,
}

// ── Downloads ──

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Download {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub file_url: String,
    pub category: Option<String>,
    pub active: bool,
    pub display_order: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadCreate {
    pub title: String,
    pub description: Option<String>,
    pub file_url: String,
    pub category: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DownloadUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub file_url: Option<String>,
    pub category: Option<String>,
    pub active: Option<bool>,
}

// ── About ──

/// One block of the "Quem somos" page (history, mission, board...)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AboutSection {
    pub id: i64,
    pub section_key: String,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub display_order: i32,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AboutSectionCreate {
    pub section_key: String,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AboutSectionUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
}

/// Drag-and-drop reorder: ids in their new display order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderRequest {
    pub ids: Vec<i64>,
}

fn default_true() -> bool {
    true
}

/// Build a URL slug from a title: lowercase ASCII, accents folded, dashes
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_dash = true;
    for ch in title.chars() {
        let folded = match ch {
            'á' | 'à' | 'â' | 'ã' | 'ä' | 'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' | 'Í' | 'Ì' | 'Î' | 'Ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' | 'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' | 'Ú' | 'Ù' | 'Û' | 'Ü' => 'u',
            'ç' | 'Ç' => 'c',
            'ñ' | 'Ñ' => 'n',
            c => c.to_ascii_lowercase(),
        };
        if folded.is_ascii_alphanumeric() {
            slug.push(folded);
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_folds_accents() {
        assert_eq!(
            slugify("Colheita de Ostras: recorde em Florianópolis!"),
            "colheita-de-ostras-recorde-em-florianopolis"
        );
        assert_eq!(slugify("Ação & Educação"), "acao-educacao");
    }

    #[test]
    fn test_slugify_trims_separators() {
        assert_eq!(slugify("  --Maricultura--  "), "maricultura");
        assert_eq!(slugify("!!!"), "");
    }
}
