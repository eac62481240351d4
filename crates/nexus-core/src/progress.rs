//! Scenario simulation progress math.
//!
//! A run starts at 0% and advances by `sample * max_step` per step. Reaching
//! or passing 100% reports exactly 100% and finishes the run.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{NexusError, Result};
use crate::random::RandomSource;

pub const PROGRESS_DONE: f64 = 100.0;

/// Policy scenarios the dashboard can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scenario {
    FuelSubsidy,
    TechHub,
    FloodImpact,
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [Scenario::FuelSubsidy, Scenario::TechHub, Scenario::FloodImpact];

    pub fn id(self) -> &'static str {
        match self {
            Scenario::FuelSubsidy => "fuel-subsidy",
            Scenario::TechHub => "tech-hub",
            Scenario::FloodImpact => "flood-impact",
        }
    }

    pub fn title(self) -> &'static str {
        self.info().title
    }

    /// Catalog entry shown next to a run.
    pub fn info(self) -> ScenarioInfo {
        match self {
            Scenario::FuelSubsidy => ScenarioInfo {
                title: "Fuel Subsidy Analysis",
                description: "Impact of removing petroleum subsidies on national economy",
                estimated_time: "5-8 minutes",
                complexity: Complexity::High,
                params: &[
                    ScenarioParam { name: "subsidyReduction", value: 75.0 },
                    ScenarioParam { name: "implementationPeriod", value: 12.0 },
                    ScenarioParam { name: "socialSupport", value: 45.0 },
                    ScenarioParam { name: "economicGrowthTarget", value: 4.2 },
                ],
            },
            Scenario::TechHub => ScenarioInfo {
                title: "Technology Hub Development",
                description: "Creating innovation hubs in Lagos, Abuja, and Port Harcourt",
                estimated_time: "3-5 minutes",
                complexity: Complexity::Medium,
                params: &[
                    ScenarioParam { name: "investment", value: 2.5 },
                    ScenarioParam { name: "jobsCreated", value: 50_000.0 },
                    ScenarioParam { name: "skillsTraining", value: 85.0 },
                    ScenarioParam { name: "privatePartnership", value: 60.0 },
                ],
            },
            Scenario::FloodImpact => ScenarioInfo {
                title: "Flood Impact Assessment",
                description: "Simulating flooding effects in Niger Delta region",
                estimated_time: "4-6 minutes",
                complexity: Complexity::High,
                params: &[
                    ScenarioParam { name: "rainfall", value: 150.0 },
                    ScenarioParam { name: "floodDuration", value: 72.0 },
                    ScenarioParam { name: "evacuationCapacity", value: 80.0 },
                    ScenarioParam { name: "reliefFunding", value: 1.2 },
                ],
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Complexity {
    Medium,
    High,
}

/// One named input of a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScenarioParam {
    pub name: &'static str,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioInfo {
    pub title: &'static str,
    pub description: &'static str,
    pub estimated_time: &'static str,
    pub complexity: Complexity,
    pub params: &'static [ScenarioParam],
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Scenario {
    type Err = NexusError;

    fn from_str(s: &str) -> Result<Self> {
        Scenario::ALL
            .into_iter()
            .find(|sc| sc.id() == s)
            .ok_or_else(|| NexusError::BadRequest(format!("unknown scenario: {s}")))
    }
}

/// Progress of one run, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Progress {
    pub percent: f64,
    pub finished: bool,
}

impl Progress {
    pub fn start() -> Self {
        Self::default()
    }

    /// Next progress value. A finished run stays where it is.
    pub fn advance<R: RandomSource + ?Sized>(self, rng: &mut R, max_step: f64) -> Self {
        if self.finished {
            return self;
        }
        let next = self.percent + rng.next_unit() * max_step;
        if next >= PROGRESS_DONE {
            Self {
                percent: PROGRESS_DONE,
                finished: true,
            }
        } else {
            Self {
                percent: next,
                finished: false,
            }
        }
    }
}
