//! Norm tables: percentile lookup data partitioned by gender and age bracket.
//!
//! Real norm tables come from calibration studies and are loaded from CSV
//! (`NormTables::from_csv_reader`). The built-in reference tables are a
//! linear stand-in covering raw scores -20..=20 at five percentile points
//! per raw point. Either way the lookup algorithm is the same: exact raw
//! match first, saturation at +-100 beyond the +-20 span, and the linear
//! formula for raw values the table does not enumerate.

use std::fmt;
use std::io::Read;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::scoring::Scale;

/// Raw scores beyond this span saturate to the percentile extremes.
pub const RAW_TABLE_SPAN: i32 = 20;
/// Percentile points per raw point used by the linear fallback.
const LINEAR_STEP: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
        }
    }
}

impl FromStr for Gender {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "m" | "male" => Ok(Gender::Male),
            "f" | "female" => Ok(Gender::Female),
            _ => Err(Error::IllegalGender),
        }
    }
}

/// The four age brackets the norm data distinguishes. Lower bounds are
/// inclusive: <25 young, 25..34 middle, 35..49 mature, 50 and up senior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeBracket {
    Young,
    Middle,
    Mature,
    Senior,
}

impl AgeBracket {
    pub const ALL: [AgeBracket; 4] = [
        AgeBracket::Young,
        AgeBracket::Middle,
        AgeBracket::Mature,
        AgeBracket::Senior,
    ];

    pub fn from_age(age: u32) -> Self {
        if age < 25 {
            AgeBracket::Young
        } else if age < 35 {
            AgeBracket::Middle
        } else if age < 50 {
            AgeBracket::Mature
        } else {
            AgeBracket::Senior
        }
    }
}

impl fmt::Display for AgeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgeBracket::Young => write!(f, "young"),
            AgeBracket::Middle => write!(f, "middle"),
            AgeBracket::Mature => write!(f, "mature"),
            AgeBracket::Senior => write!(f, "senior"),
        }
    }
}

/// One table row: a raw score and the percentile it maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormEntry {
    pub raw: i32,
    pub percentile: i32,
}

/// Lookup lists for one scale within one (gender, bracket) table: `plus`
/// holds raw scores 0 and up in ascending order, `minus` holds 0 and down
/// in descending order. Raw zero appears in both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleNorms {
    pub plus: Vec<NormEntry>,
    pub minus: Vec<NormEntry>,
}

impl ScaleNorms {
    /// Reference linear table: raw -20..=20, percentile = raw * 5.
    pub fn reference() -> Self {
        let plus = (0..=RAW_TABLE_SPAN)
            .map(|raw| NormEntry {
                raw,
                percentile: raw * LINEAR_STEP,
            })
            .collect();
        let minus = (0..=RAW_TABLE_SPAN)
            .map(|offset| NormEntry {
                raw: -offset,
                percentile: -offset * LINEAR_STEP,
            })
            .collect();
        ScaleNorms { plus, minus }
    }

    /// Map a raw score to its percentile.
    ///
    /// Exact-match lookup, deliberately not interpolation: stored results
    /// depend on this being bit-for-bit stable. When the exact raw value is
    /// absent the score saturates to +-100 beyond the +-20 span and falls
    /// back to the linear formula inside it.
    pub fn percentile(&self, raw: i32) -> i32 {
        if raw >= 0 {
            if let Some(entry) = self.plus.iter().find(|entry| entry.raw == raw) {
                return entry.percentile;
            }
            if raw > RAW_TABLE_SPAN {
                100
            } else {
                raw * LINEAR_STEP
            }
        } else {
            if let Some(entry) = self.minus.iter().find(|entry| entry.raw == raw) {
                return entry.percentile;
            }
            if raw < -RAW_TABLE_SPAN {
                -100
            } else {
                raw * LINEAR_STEP
            }
        }
    }
}

/// One CSV row of external norm data.
#[derive(Debug, Deserialize)]
struct NormRow {
    gender: Gender,
    age_group: AgeBracket,
    scale: Scale,
    raw: i32,
    percentile: i32,
}

type ScaleSet = [ScaleNorms; 10];

/// The full norm lookup: one `ScaleNorms` per scale per (gender, bracket).
///
/// Construction guarantees every (gender, age, scale) combination resolves,
/// so lookups are total. A gap in loaded data is rejected at load time as
/// `Error::MalformedNorms` rather than surfacing as a silent zero later.
#[derive(Debug, Clone)]
pub struct NormTables {
    tables: [[ScaleSet; 4]; 2],
}

impl NormTables {
    /// Fully populated reference tables for every gender and bracket.
    pub fn reference() -> Self {
        NormTables {
            tables: std::array::from_fn(|_| {
                std::array::from_fn(|_| std::array::from_fn(|_| ScaleNorms::reference()))
            }),
        }
    }

    /// Load external norm data from CSV with the header
    /// `gender,age_group,scale,raw,percentile`.
    ///
    /// Rows with raw >= 0 populate the plus list, raw <= 0 the minus list.
    /// Percentiles must lie in [-100, 100] and every (gender, bracket,
    /// scale) triple must receive at least one entry.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, Error> {
        let mut tables: [[ScaleSet; 4]; 2] = Default::default();

        let mut csv_reader = csv::Reader::from_reader(reader);
        for row in csv_reader.deserialize() {
            let row: NormRow = row?;
            if !(-100..=100).contains(&row.percentile) {
                return Err(Error::PercentileOutOfRange {
                    raw: row.raw,
                    percentile: row.percentile,
                });
            }
            let entry = NormEntry {
                raw: row.raw,
                percentile: row.percentile,
            };
            let norms = &mut tables[row.gender as usize][row.age_group as usize][row.scale as usize];
            if row.raw >= 0 {
                norms.plus.push(entry);
            }
            if row.raw <= 0 {
                norms.minus.push(entry);
            }
        }

        for (gender_index, gender) in Gender::ALL.into_iter().enumerate() {
            for (bracket_index, bracket) in AgeBracket::ALL.into_iter().enumerate() {
                for (scale_index, scale) in Scale::ALL.into_iter().enumerate() {
                    let norms = &mut tables[gender_index][bracket_index][scale_index];
                    if norms.plus.is_empty() && norms.minus.is_empty() {
                        return Err(Error::MalformedNorms {
                            gender,
                            bracket,
                            scale,
                        });
                    }
                    norms.plus.sort_by_key(|entry| entry.raw);
                    norms.minus.sort_by_key(|entry| std::cmp::Reverse(entry.raw));
                }
            }
        }

        Ok(NormTables { tables })
    }

    /// The lookup lists for one scale, resolved by gender and age.
    pub fn scale_norms(&self, gender: Gender, age: u32, scale: Scale) -> &ScaleNorms {
        &self.tables[gender as usize][AgeBracket::from_age(age) as usize][scale as usize]
    }

    /// Map one raw score for one scale to its percentile.
    pub fn percentile(&self, gender: Gender, age: u32, scale: Scale, raw: i32) -> i32 {
        self.scale_norms(gender, age, scale).percentile(raw)
    }
}
