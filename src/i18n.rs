//! Localized strings for generated content.
//!
//! Only strings the build itself produces live here: synthesized folder titles,
//! item counts, and component labels. Lookup falls back from the full locale
//! (`fr-FR`) to its language (`fr`) and finally to `en-US`.

pub struct Translation {
    pub locale: &'static str,
    /// Noun used in synthesized folder page titles (`"Folder: notes"`).
    pub folder: &'static str,
    pub untitled: &'static str,
    pub home: &'static str,
    pub explorer: &'static str,
    /// Singular item-count sentence.
    pub item_under_folder: &'static str,
    /// Plural item-count sentence; `{count}` is replaced.
    pub items_under_folder: &'static str,
    /// Reading-time label; `{minutes}` is replaced.
    pub reading_time: &'static str,
    pub created_with: &'static str,
}

impl Translation {
    pub fn items_under_folder(&self, count: usize) -> String {
        if count == 1 {
            self.item_under_folder.to_string()
        } else {
            self.items_under_folder
                .replace("{count}", &count.to_string())
        }
    }

    pub fn reading_time(&self, minutes: usize) -> String {
        self.reading_time.replace("{minutes}", &minutes.to_string())
    }

    /// Title of a synthesized folder page: `"<folder noun>: <key>"`.
    pub fn folder_title(&self, key: &str) -> String {
        format!("{}: {}", self.folder, key)
    }
}

static EN_US: Translation = Translation {
    locale: "en-US",
    folder: "Folder",
    untitled: "Untitled",
    home: "Home",
    explorer: "Explorer",
    item_under_folder: "1 item under this folder.",
    items_under_folder: "{count} items under this folder.",
    reading_time: "{minutes} min read",
    created_with: "Created with",
};

static FR_FR: Translation = Translation {
    locale: "fr-FR",
    folder: "Dossier",
    untitled: "Sans titre",
    home: "Accueil",
    explorer: "Explorateur",
    item_under_folder: "1 élément sous ce dossier.",
    items_under_folder: "{count} éléments sous ce dossier.",
    reading_time: "{minutes} min de lecture",
    created_with: "Créé avec",
};

static DE_DE: Translation = Translation {
    locale: "de-DE",
    folder: "Ordner",
    untitled: "Ohne Titel",
    home: "Startseite",
    explorer: "Explorer",
    item_under_folder: "1 Datei in diesem Ordner.",
    items_under_folder: "{count} Dateien in diesem Ordner.",
    reading_time: "{minutes} Min. Lesezeit",
    created_with: "Erstellt mit",
};

static ES_ES: Translation = Translation {
    locale: "es-ES",
    folder: "Carpeta",
    untitled: "Sin título",
    home: "Inicio",
    explorer: "Explorador",
    item_under_folder: "1 elemento en esta carpeta.",
    items_under_folder: "{count} elementos en esta carpeta.",
    reading_time: "Se lee en {minutes} min",
    created_with: "Creado con",
};

static JA_JP: Translation = Translation {
    locale: "ja-JP",
    folder: "フォルダ",
    untitled: "無題",
    home: "ホーム",
    explorer: "エクスプローラー",
    item_under_folder: "1件の項目",
    items_under_folder: "{count}件の項目",
    reading_time: "{minutes} min read",
    created_with: "作成",
};

static TRANSLATIONS: &[&Translation] = &[&EN_US, &FR_FR, &DE_DE, &ES_ES, &JA_JP];

/// Look up the translation table for a locale.
pub fn translation(locale: &str) -> &'static Translation {
    let exact = TRANSLATIONS
        .iter()
        .find(|t| t.locale.eq_ignore_ascii_case(locale))
        .copied();
    if let Some(t) = exact {
        return t;
    }

    let language = locale.split(['-', '_']).next().unwrap_or(locale);
    TRANSLATIONS
        .iter()
        .find(|t| {
            t.locale
                .split('-')
                .next()
                .is_some_and(|l| l.eq_ignore_ascii_case(language))
        })
        .copied()
        .unwrap_or(&EN_US)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_locale() {
        assert_eq!(translation("fr-FR").folder, "Dossier");
        assert_eq!(translation("de-de").folder, "Ordner");
    }

    #[test]
    fn language_fallback() {
        assert_eq!(translation("fr").locale, "fr-FR");
        assert_eq!(translation("es_MX").locale, "es-ES");
    }

    #[test]
    fn unknown_locale_falls_back_to_english() {
        assert_eq!(translation("xx-YY").locale, "en-US");
        assert_eq!(translation("").locale, "en-US");
    }

    #[test]
    fn item_counts_pluralize() {
        let t = translation("en-US");
        assert_eq!(t.items_under_folder(1), "1 item under this folder.");
        assert_eq!(t.items_under_folder(3), "3 items under this folder.");
        assert_eq!(t.items_under_folder(0), "0 items under this folder.");
    }

    #[test]
    fn folder_title_format() {
        assert_eq!(translation("en-US").folder_title("a/b"), "Folder: a/b");
    }
}
