use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Logical datasets the loader can produce
///
/// CPI annual and CPI monthly are two views of the same workbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dataset {
    FishPool,
    CpiAnnual,
    CpiMonthly,
    EurNok,
    SsbExport,
    Escapes,
    Biomass,
    PigPrice,
}

impl Dataset {
    pub const ALL: [Dataset; 8] = [
        Dataset::FishPool,
        Dataset::CpiAnnual,
        Dataset::CpiMonthly,
        Dataset::EurNok,
        Dataset::SsbExport,
        Dataset::Escapes,
        Dataset::Biomass,
        Dataset::PigPrice,
    ];

    /// Short identifier used on the command line and in error messages
    pub fn slug(&self) -> &'static str {
        match self {
            Dataset::FishPool => "fish-pool",
            Dataset::CpiAnnual => "cpi-annual",
            Dataset::CpiMonthly => "cpi-monthly",
            Dataset::EurNok => "eurnok",
            Dataset::SsbExport => "ssb-export",
            Dataset::Escapes => "escapes",
            Dataset::Biomass => "biomass",
            Dataset::PigPrice => "pig-price",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Dataset::FishPool => "Fish Pool Index weekly salmon price (NOK/kg, EUR/kg)",
            Dataset::CpiAnnual => "SSB Norwegian consumer price index, annual",
            Dataset::CpiMonthly => "SSB Norwegian consumer price index, monthly",
            Dataset::EurNok => "Norges Bank EURNOK daily spot rate",
            Dataset::SsbExport => "SSB weekly exported salmon tons and NOK/kg",
            Dataset::Escapes => "Directorate of Fisheries reported salmon escapes",
            Dataset::Biomass => "Directorate of Fisheries monthly biomass per production area",
            Dataset::PigPrice => "German pig price",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown dataset '{0}' (expected one of: fish-pool, cpi-annual, cpi-monthly, eurnok, ssb-export, escapes, biomass, pig-price)")]
pub struct UnknownDataset(pub String);

impl FromStr for Dataset {
    type Err = UnknownDataset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        Dataset::ALL
            .into_iter()
            .find(|d| d.slug() == wanted)
            .ok_or_else(|| UnknownDataset(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_round_trips_through_from_str() {
        for dataset in Dataset::ALL {
            assert_eq!(dataset.slug().parse::<Dataset>(), Ok(dataset));
        }
    }

    #[test]
    fn test_from_str_accepts_underscores_and_case() {
        assert_eq!("SSB_EXPORT".parse::<Dataset>(), Ok(Dataset::SsbExport));
    }

    #[test]
    fn test_from_str_unknown() {
        let err = "salmon".parse::<Dataset>().unwrap_err();
        assert!(err.to_string().contains("salmon"));
    }
}
