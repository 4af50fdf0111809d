use std::borrow::Cow;
use std::str::FromStr;

use serde::Serialize;

use crate::dataset::{Respondent, numeric_label};
use crate::error::{Axis, Error};

/// A categorical column that can drive one axis of the cross-tab chart.
pub trait Categorical: Copy {
    /// Column name as shown in the dropdown.
    fn name(self) -> &'static str;

    /// Category label of a respondent, `None` when missing.
    fn label(self, respondent: &Respondent) -> Option<Cow<'_, str>>;
}

/// Attitude and satisfaction columns selectable on the x-axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum XColumn {
    Satjob,
    Relationship,
    MaleBreadwinner,
    MenBettersuited,
    ChildSuffer,
    MenOverwork,
}

impl XColumn {
    pub const ALL: [XColumn; 6] = [
        XColumn::Satjob,
        XColumn::Relationship,
        XColumn::MaleBreadwinner,
        XColumn::MenBettersuited,
        XColumn::ChildSuffer,
        XColumn::MenOverwork,
    ];

    pub const DEFAULT: XColumn = XColumn::MaleBreadwinner;

    /// Position in [`XColumn::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl Categorical for XColumn {
    fn name(self) -> &'static str {
        match self {
            XColumn::Satjob => "satjob",
            XColumn::Relationship => "relationship",
            XColumn::MaleBreadwinner => "male_breadwinner",
            XColumn::MenBettersuited => "men_bettersuited",
            XColumn::ChildSuffer => "child_suffer",
            XColumn::MenOverwork => "men_overwork",
        }
    }

    fn label(self, respondent: &Respondent) -> Option<Cow<'_, str>> {
        let value = match self {
            XColumn::Satjob => &respondent.satjob,
            XColumn::Relationship => &respondent.relationship,
            XColumn::MaleBreadwinner => &respondent.male_breadwinner,
            XColumn::MenBettersuited => &respondent.men_bettersuited,
            XColumn::ChildSuffer => &respondent.child_suffer,
            XColumn::MenOverwork => &respondent.men_overwork,
        };
        value.as_deref().map(Cow::Borrowed)
    }
}

impl FromStr for XColumn {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        XColumn::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| Error::InvalidSelection {
                axis: Axis::X,
                name: s.to_string(),
            })
    }
}

/// Demographic columns selectable on the y-axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum YColumn {
    Sex,
    Region,
    Education,
}

impl YColumn {
    pub const ALL: [YColumn; 3] = [YColumn::Sex, YColumn::Region, YColumn::Education];

    pub const DEFAULT: YColumn = YColumn::Sex;

    pub fn index(self) -> usize {
        self as usize
    }
}

impl Categorical for YColumn {
    fn name(self) -> &'static str {
        match self {
            YColumn::Sex => "sex",
            YColumn::Region => "region",
            YColumn::Education => "education",
        }
    }

    fn label(self, respondent: &Respondent) -> Option<Cow<'_, str>> {
        match self {
            YColumn::Sex => respondent.sex.as_deref().map(Cow::Borrowed),
            YColumn::Region => respondent.region.as_deref().map(Cow::Borrowed),
            YColumn::Education => respondent.education.map(|v| Cow::Owned(numeric_label(v))),
        }
    }
}

impl FromStr for YColumn {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        YColumn::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| Error::InvalidSelection {
                axis: Axis::Y,
                name: s.to_string(),
            })
    }
}

/// Parse both dropdown values, rejecting the x name first.
pub fn parse_selection(x: &str, y: &str) -> Result<(XColumn, YColumn), Error> {
    Ok((x.parse()?, y.parse()?))
}
