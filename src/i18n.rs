//! Message localization for API error envelopes.
//!
//! The admin front-ends negotiate a language per request via
//! `Accept-Language`; error messages are resolved against a small
//! per-language dictionary. Unknown keys fall back to English and finally
//! to the key text itself.

/// Languages the admin front-ends ship translations for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    En,
    Es,
    Pt,
}

impl Language {
    /// Picks the language from an `Accept-Language` header value, using the
    /// first listed tag and ignoring quality weights.
    pub fn from_header(raw: &str) -> Self {
        let primary = raw.split(',').next().unwrap_or("").trim();
        let tag = primary
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();

        if tag.starts_with("es") {
            Self::Es
        } else if tag.starts_with("pt") {
            Self::Pt
        } else {
            Self::En
        }
    }
}

/// Resolves a message key for the given language.
pub fn message(language: Language, key: &str) -> String {
    lookup(language, key)
        .or_else(|| lookup(Language::En, key))
        .map(str::to_string)
        .unwrap_or_else(|| key.to_string())
}

fn lookup(language: Language, key: &str) -> Option<&'static str> {
    let table = match language {
        Language::En => EN,
        Language::Es => ES,
        Language::Pt => PT,
    };
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

const EN: &[(&str, &str)] = &[
    ("errors.notFound", "Record not found"),
    ("errors.internal", "An internal error occurred"),
    ("importer.errors.importHashRequired", "importHash is required"),
    (
        "importer.errors.importHashExistent",
        "Data has already been imported",
    ),
    (
        "category.errors.unique.slug",
        "Category slug is already in use",
    ),
    (
        "category.errors.unique.importHash",
        "Category importHash is already in use",
    ),
];

const ES: &[(&str, &str)] = &[
    ("errors.notFound", "Registro no encontrado"),
    ("errors.internal", "Ocurrió un error interno"),
    ("importer.errors.importHashRequired", "importHash es obligatorio"),
    (
        "importer.errors.importHashExistent",
        "Estos datos ya fueron importados",
    ),
    (
        "category.errors.unique.slug",
        "El slug de la categoría ya está en uso",
    ),
    (
        "category.errors.unique.importHash",
        "El importHash de la categoría ya está en uso",
    ),
];

const PT: &[(&str, &str)] = &[
    ("errors.notFound", "Registro não encontrado"),
    ("errors.internal", "Ocorreu um erro interno"),
    ("importer.errors.importHashRequired", "importHash é obrigatório"),
    (
        "importer.errors.importHashExistent",
        "Esses dados já foram importados",
    ),
    (
        "category.errors.unique.slug",
        "O slug da categoria já está em uso",
    ),
    (
        "category.errors.unique.importHash",
        "O importHash da categoria já está em uso",
    ),
];
