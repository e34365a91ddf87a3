use serde::Serialize;

use super::domain::FitBand;

/// Display label and color token for a band, as rendered by dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BandPresentation {
    pub label: &'static str,
    pub color: &'static str,
}

/// `None` is the not-evaluated state of a partial application.
pub const fn presentation(band: Option<FitBand>) -> BandPresentation {
    match band {
        Some(FitBand::Perfect) => BandPresentation {
            label: "Perfect Fit",
            color: "green",
        },
        Some(FitBand::Great) => BandPresentation {
            label: "Great Fit",
            color: "blue",
        },
        Some(FitBand::Issues) => BandPresentation {
            label: "Has Issues",
            color: "yellow",
        },
        Some(FitBand::Bad) => BandPresentation {
            label: "Bad Fit",
            color: "red",
        },
        None => BandPresentation {
            label: "Not Evaluated",
            color: "gray",
        },
    }
}

pub const fn band_label(band: Option<FitBand>) -> &'static str {
    presentation(band).label
}

pub const fn band_color(band: Option<FitBand>) -> &'static str {
    presentation(band).color
}
