use std::fmt;

// Census GCP G01 table (Australian Bureau of Statistics, 2021).
pub const CENSUS_CODE: &str = "POA_CODE_2021";
pub const CENSUS_POPULATION: &str = "Tot_P_P";

// Prefix the census puts in front of every postal area code, e.g. POA2000.
pub const POA_PREFIX: &str = "POA";

pub const POSTCODE: &str = "POSTCODE";
pub const POPULATION: &str = "POPULATION";
pub const FIREARMS: &str = "FIREARMS";
pub const FIREARMS_PER_1000: &str = "FIREARMS_PER_1000";

// Postal area code attribute of the ABS boundary set.
pub const BOUNDARY_CODE: &str = "POA_CODE21";

pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PopulationRow {
    pub code: String,
    // Copied verbatim from the census, never parsed.
    pub population: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PostcodeRecord {
    pub code: String,
    pub population: Option<String>,
    pub firearms: String,
    pub rate: Rate,
}

impl PostcodeRecord {
    pub fn new(code: String, population: Option<String>, firearms: String) -> Self {
        let rate = Rate::derive(&firearms, population.as_deref());
        Self {
            code,
            population,
            firearms,
            rate,
        }
    }

    pub fn population_field(&self) -> &str {
        self.population.as_deref().unwrap_or(NOT_AVAILABLE)
    }
}

/// Firearms per 1000 people.
///
/// The combined CSV distinguishes a postcode without any population entry
/// (empty field) from one whose numbers could not produce a rate (`N/A`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Rate {
    NoPopulation,
    NotAvailable,
    PerThousand(f64),
}

impl Rate {
    pub fn derive(firearms: &str, population: Option<&str>) -> Self {
        let Some(population) = population else {
            return Self::NoPopulation;
        };
        let (Ok(firearms), Ok(population)) = (
            firearms.trim().parse::<i64>(),
            population.trim().parse::<i64>(),
        ) else {
            return Self::NotAvailable;
        };
        if population == 0 {
            return Self::NotAvailable;
        }
        Self::PerThousand(firearms as f64 / population as f64 * 1000.0)
    }

    /// Reads a `FIREARMS_PER_1000` field back from a combined CSV.
    pub fn parse(field: &str) -> Self {
        match field.trim() {
            "" => Self::NoPopulation,
            NOT_AVAILABLE => Self::NotAvailable,
            value => value
                .parse::<f64>()
                .map(Self::PerThousand)
                .unwrap_or(Self::NotAvailable),
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Self::PerThousand(value) => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPopulation => Ok(()),
            Self::NotAvailable => f.write_str(NOT_AVAILABLE),
            Self::PerThousand(value) => write!(f, "{value:.2}"),
        }
    }
}

/// Removes the census `POA` prefix, leaving other codes untouched.
pub fn strip_prefix(code: &str) -> &str {
    code.strip_prefix(POA_PREFIX).unwrap_or(code)
}
