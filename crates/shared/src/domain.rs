use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::UnknownScreen;

macro_rules! screen_ids {
    ($($variant:ident),+ $(,)?) => {
        /// Statically declared identifier of a demonstration screen.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum ScreenId {
            $($variant,)+
        }

        impl ScreenId {
            pub const ALL: &'static [ScreenId] = &[$(ScreenId::$variant,)+];

            pub fn name(self) -> &'static str {
                match self {
                    $(ScreenId::$variant => stringify!($variant),)+
                }
            }
        }
    };
}

screen_ids!(
    JustOperator,
    RangeOperator,
    TimerOperator,
    IntervalOperator,
    MapOperator,
    FlatMapOperator,
    ScanOperator,
    BufferOperator,
    FilterOperator,
    TakeOperator,
    SkipOperator,
    SkipLastOperator,
    DistinctOperator,
    ThrottleOperator,
    MergeOperator,
    ConcatOperator,
    ZipOperator,
    ReduceOperator,
    ErrorOperator,
    OnErrorReturnOperator,
    RetryOperator,
    EventBusPublish,
    EventBusTicker,
);

impl ScreenId {
    /// Conventional file name of the screen's source listing.
    pub fn asset_path(self) -> String {
        format!("{}.txt", self.name())
    }

    pub fn from_name(name: &str) -> Result<Self, UnknownScreen> {
        let wanted = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownScreen(wanted.to_string()))
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScreenId {
    type Err = UnknownScreen;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    OneShot,
    Continuous,
}
