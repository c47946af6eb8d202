//! Chart generation and rendering for the dashboard.
//!
//! This module creates interactive ECharts visualizations of a month:
//! - **Price Ranges**: Bar chart of how many transactions fall in each price range
//! - **Categories**: Pie chart of the number of transactions per category
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with corresponding HTML containers and JavaScript initialization code.

use std::collections::BTreeMap;

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{AxisPointer, AxisPointerType, AxisType, Tooltip, Trigger},
    series::{Bar, Pie},
};
use maud::{Markup, PreEscaped, html};

use crate::{aggregation::PriceRangeCount, html::HeadElement};

/// The HTML element ID of the price range chart.
pub(super) const PRICE_RANGE_CHART_ID: &str = "price-range-chart";
/// The HTML element ID of the category chart.
pub(super) const CATEGORY_CHART_ID: &str = "category-chart";

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML containers for dashboard charts.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id,
                escape_script_text(&chart.options)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// Stop text from user data, such as a category name, from closing the
/// script element early.
fn escape_script_text(text: &str) -> String {
    text.replace("</", "<\\/")
}

pub(super) fn price_range_chart(histogram: &[PriceRangeCount]) -> Chart {
    let labels: Vec<String> = histogram.iter().map(|bucket| bucket.range.clone()).collect();
    let counts: Vec<f64> = histogram.iter().map(|bucket| bucket.count as f64).collect();

    Chart::new()
        .title(
            Title::new()
                .text("Price Ranges")
                .subtext("Number of transactions per price range"),
        )
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(Axis::new().type_(AxisType::Value))
        .series(Bar::new().name("Transactions").data(counts))
}

pub(super) fn category_chart(category_counts: &BTreeMap<String, u64>) -> Chart {
    let data: Vec<(f64, &str)> = category_counts
        .iter()
        .map(|(category, &count)| (count as f64, category.as_str()))
        .collect();

    Chart::new()
        .title(
            Title::new()
                .text("Categories")
                .subtext("Number of transactions per category"),
        )
        .tooltip(Tooltip::new().trigger(Trigger::Item))
        .legend(Legend::new().top("bottom"))
        .series(
            Pie::new()
                .name("Transactions")
                .radius(vec!["40%", "70%"])
                .data(data),
        )
}
