use crate::{
    backend::types::{Country, Industry},
    locale::Locale,
    web::{handlers::require_locale, state::PortalState},
};
use axum::{
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    Extension,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::error;

/// Knowledge item kinds published on the marketplace.
const KNOWLEDGE_KINDS: &[&str] = &["report", "insight", "data", "manual", "course"];

#[derive(Serialize)]
struct Listing<T> {
    locale: &'static str,
    /// Set when the backend was unreachable and a built-in dataset is served.
    degraded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    items: Vec<T>,
}

#[derive(Serialize)]
struct Detail<T> {
    locale: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    item: Option<T>,
}

/// Industry list, cached per locale. Backend failures serve the fallback
/// dataset flagged `degraded` so the page always renders.
pub async fn industries(
    Extension(state): Extension<Arc<PortalState>>,
    Path(raw_locale): Path<String>,
) -> Response {
    let locale = match require_locale(&raw_locale) {
        Ok(locale) => locale,
        Err(status) => return status.into_response(),
    };

    match state.industries(locale).await {
        Ok(items) => Json(Listing {
            locale: locale.as_str(),
            degraded: false,
            error: None,
            items: items.as_ref().clone(),
        })
        .into_response(),
        Err(err) => {
            error!("Failed to load industries: {err:#}");
            Json(Listing {
                locale: locale.as_str(),
                degraded: true,
                error: Some("The industry list is temporarily unavailable".to_string()),
                items: fallback_industries(locale),
            })
            .into_response()
        }
    }
}

/// Industry detail with its topics.
pub async fn industry(
    Extension(state): Extension<Arc<PortalState>>,
    Path((raw_locale, slug)): Path<(String, String)>,
) -> Response {
    let locale = match require_locale(&raw_locale) {
        Ok(locale) => locale,
        Err(status) => return status.into_response(),
    };

    match state.backend().industry(locale, &slug).await {
        Ok(Some(detail)) => Json(Detail {
            locale: locale.as_str(),
            error: None,
            item: Some(detail),
        })
        .into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(err) => {
            error!("Failed to load industry {slug}: {err:#}");
            Json(Detail::<crate::backend::types::IndustryDetail> {
                locale: locale.as_str(),
                error: Some("This industry page is temporarily unavailable".to_string()),
                item: None,
            })
            .into_response()
        }
    }
}

/// Knowledge item detail. Unknown kinds are answered 404 before any fetch.
pub async fn knowledge(
    Extension(state): Extension<Arc<PortalState>>,
    Path((raw_locale, kind, slug)): Path<(String, String, String)>,
) -> Response {
    let locale = match require_locale(&raw_locale) {
        Ok(locale) => locale,
        Err(status) => return status.into_response(),
    };
    if !KNOWLEDGE_KINDS.contains(&kind.as_str()) {
        return StatusCode::NOT_FOUND.into_response();
    }

    match state.backend().knowledge(locale, &kind, &slug).await {
        Ok(Some(item)) => Json(Detail {
            locale: locale.as_str(),
            error: None,
            item: Some(item),
        })
        .into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(err) => {
            error!("Failed to load knowledge {kind}/{slug}: {err:#}");
            Json(Detail::<crate::backend::types::Knowledge> {
                locale: locale.as_str(),
                error: Some("This knowledge item is temporarily unavailable".to_string()),
                item: None,
            })
            .into_response()
        }
    }
}

/// Country lookup data for onboarding forms, cached per locale.
pub async fn countries(
    Extension(state): Extension<Arc<PortalState>>,
    Path(raw_locale): Path<String>,
) -> Response {
    let locale = match require_locale(&raw_locale) {
        Ok(locale) => locale,
        Err(status) => return status.into_response(),
    };

    match state.countries(locale).await {
        Ok(items) => Json(Listing {
            locale: locale.as_str(),
            degraded: false,
            error: None,
            items: items.as_ref().clone(),
        })
        .into_response(),
        Err(err) => {
            error!("Failed to load countries: {err:#}");
            Json(Listing {
                locale: locale.as_str(),
                degraded: true,
                error: Some("The country list is temporarily unavailable".to_string()),
                items: fallback_countries(locale),
            })
            .into_response()
        }
    }
}

fn fallback_industries(locale: Locale) -> Vec<Industry> {
    let names: &[(&str, &str)] = match locale {
        Locale::En => &[
            ("technology", "Technology"),
            ("healthcare", "Healthcare"),
            ("finance", "Finance"),
            ("energy", "Energy"),
        ],
        Locale::Ar => &[
            ("technology", "التقنية"),
            ("healthcare", "الرعاية الصحية"),
            ("finance", "المالية"),
            ("energy", "الطاقة"),
        ],
    };

    names
        .iter()
        .enumerate()
        .map(|(index, (slug, name))| Industry {
            id: index as u64 + 1,
            slug: (*slug).to_string(),
            name: (*name).to_string(),
            knowledge_count: 0,
        })
        .collect()
}

fn fallback_countries(locale: Locale) -> Vec<Country> {
    let names: &[(&str, &str)] = match locale {
        Locale::En => &[
            ("SA", "Saudi Arabia"),
            ("AE", "United Arab Emirates"),
            ("EG", "Egypt"),
            ("US", "United States"),
        ],
        Locale::Ar => &[
            ("SA", "المملكة العربية السعودية"),
            ("AE", "الإمارات العربية المتحدة"),
            ("EG", "مصر"),
            ("US", "الولايات المتحدة"),
        ],
    };

    names
        .iter()
        .enumerate()
        .map(|(index, (iso2, name))| Country {
            id: index as u64 + 1,
            name: (*name).to_string(),
            iso2: Some((*iso2).to_string()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_datasets_are_localized() {
        let en = fallback_industries(Locale::En);
        let ar = fallback_industries(Locale::Ar);
        assert_eq!(en.len(), ar.len());
        assert_eq!(en[0].slug, ar[0].slug);
        assert_ne!(en[0].name, ar[0].name);
    }

    #[test]
    fn fallback_countries_carry_iso_codes() {
        let countries = fallback_countries(Locale::En);
        assert!(countries.iter().all(|country| country.iso2.is_some()));
    }

    #[test]
    fn knowledge_kinds_cover_marketplace_types() {
        for kind in ["report", "insight", "data", "manual", "course"] {
            assert!(KNOWLEDGE_KINDS.contains(&kind));
        }
        assert!(!KNOWLEDGE_KINDS.contains(&"podcast"));
    }
}
