use handlebars::Handlebars;
use serde::Serialize;

use crate::charts::StaticChart;
use crate::error::{Error, Result};
use crate::selection::{Categorical, XColumn, YColumn};

const TEMPLATE: &str = include_str!("./static/dashboard.hbs");

// Trusted markup, rendered unescaped
const PEW_TEXT: &str = "The <a href=\"https://www.pewresearch.org/short-reads/2023/03/01/\
gender-pay-gap-facts/\">Pew Research Center</a> reports that the gap between women's and men's \
wages has persisted for the past 20 years, and describes differences in choices made at work by \
gender that may affect pay.";

const GSS_TEXT: &str = "The General Social Survey (GSS) is a sociological and attitudinal survey \
conducted since 1972 by NORC at the University of Chicago with funding from the National Science \
Foundation. It follows trends in American society across political behaviour, social inequality, \
race relations, gender roles and religion, through face-to-face and telephone interviews with a \
sample of the US population. The data is \
<a href=\"https://gssdataexplorer.norc.org/\">available to the public</a>.";

/// Column glossary shown under the introduction.
const COLUMN_DOCS: [(&str, &str); 17] = [
    ("id", "a numeric unique ID for each person who responded to the survey"),
    ("weight", "survey sample weights"),
    ("sex", "male or female"),
    ("education", "years of formal education"),
    ("region", "region of the country where the respondent lives"),
    ("age", "age"),
    ("income", "the respondent's personal annual income"),
    ("job_prestige", "the respondent's occupational prestige score"),
    ("mother_job_prestige", "the respondent's mother's occupational prestige score"),
    ("father_job_prestige", "the respondent's father's occupational prestige score"),
    ("socioeconomic_index", "an index measuring the respondent's socioeconomic status"),
    ("satjob", "\"On the whole, how satisfied are you with the work you do?\""),
    (
        "relationship",
        "agree or disagree: \"A working mother can establish just as warm and secure a \
         relationship with her children as a mother who does not work.\"",
    ),
    (
        "male_breadwinner",
        "agree or disagree: \"It is much better for everyone involved if the man is the \
         achiever outside the home and the woman takes care of the home and family.\"",
    ),
    (
        "men_bettersuited",
        "agree or disagree: \"Most men are better suited emotionally for politics than are \
         most women.\"",
    ),
    (
        "child_suffer",
        "agree or disagree: \"A preschool child is likely to suffer if his or her mother works.\"",
    ),
    (
        "men_overwork",
        "agree or disagree: \"Family life often suffers because men concentrate too much on \
         their work.\"",
    ),
];

#[derive(Serialize)]
struct ColumnDoc {
    name: &'static str,
    description: &'static str,
}

#[derive(Serialize)]
struct SelectOption {
    name: &'static str,
    selected: bool,
}

#[derive(Serialize)]
struct ChartImage {
    src: String,
    title: &'static str,
}

#[derive(Serialize)]
struct PageData {
    intro: [&'static str; 2],
    columns: Vec<ColumnDoc>,
    x_options: Vec<SelectOption>,
    y_options: Vec<SelectOption>,
    x_default: &'static str,
    y_default: &'static str,
    summary_table: String,
    distributions: Vec<ChartImage>,
    comparisons: Vec<ChartImage>,
}

fn chart_image(chart: StaticChart, title: &'static str) -> ChartImage {
    ChartImage {
        src: format!("/charts/static/{}.png", chart.name()),
        title,
    }
}

/// Render the dashboard page with the dropdowns set to their defaults.
pub fn render_page() -> Result<String> {
    let mut handlebars = Handlebars::new();
    handlebars
        .register_template_string("dashboard", TEMPLATE)
        .map_err(|e| Error::Render(e.to_string()))?;

    let data = PageData {
        intro: [PEW_TEXT, GSS_TEXT],
        columns: COLUMN_DOCS
            .iter()
            .map(|&(name, description)| ColumnDoc { name, description })
            .collect(),
        x_options: XColumn::ALL
            .iter()
            .map(|&c| SelectOption {
                name: c.name(),
                selected: c == XColumn::DEFAULT,
            })
            .collect(),
        y_options: YColumn::ALL
            .iter()
            .map(|&c| SelectOption {
                name: c.name(),
                selected: c == YColumn::DEFAULT,
            })
            .collect(),
        x_default: XColumn::DEFAULT.name(),
        y_default: YColumn::DEFAULT.name(),
        summary_table: format!("/charts/static/{}.png", StaticChart::SummaryTable.name()),
        distributions: vec![
            chart_image(StaticChart::IncomeViolin, "Distribution of Income by Gender"),
            chart_image(
                StaticChart::PrestigeViolin,
                "Distribution of Occupation Prestige by Gender",
            ),
        ],
        comparisons: vec![
            chart_image(StaticChart::PrestigeBox, "Occupational Prestige Categories by Gender"),
            chart_image(StaticChart::PrestigeIncomeScatter, "Occupational Prestige Vs Income"),
        ],
    };

    handlebars
        .render("dashboard", &data)
        .map_err(|e| Error::Render(e.to_string()))
}
