//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - The route handler for displaying the dashboard
//! - HTML view functions for rendering the dashboard UI
//! - State and query types used by the handler

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State, rejection::QueryRejection},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Month;

use crate::{
    AppState, Error,
    combined::{COMBINED_PAGE_SIZE, CombinedData, compose_combined_data},
    dashboard::{
        cards::statistics_cards_view,
        charts::{
            CATEGORY_CHART_ID, DashboardChart, PRICE_RANGE_CHART_ID, category_chart,
            charts_script, charts_view, price_range_chart,
        },
        tables::{pagination_view, transactions_table},
    },
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, ECHARTS_SCRIPT_URL, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        HeadElement, PAGE_CONTAINER_STYLE, base, error_view, link,
    },
    month::{all_months, parse_month},
    pagination::{PaginationConfig, create_pagination_indicators, page_count},
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The config that controls the page links.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The query parameters for the dashboard page.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// The month name, defaults to January.
    pub month: Option<String>,
    /// Text to look for in the title, description or category.
    pub search: Option<String>,
    /// The 1-based page of the transaction table.
    pub page: Option<u64>,
}

/// The query string of a link to another dashboard page.
#[derive(Serialize)]
struct DashboardLink<'a> {
    month: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    search: Option<&'a str>,
    page: u64,
}

/// The normalised selection shown on the page.
struct DashboardSelection<'a> {
    month: Month,
    search: Option<&'a str>,
    page: u64,
}

impl DashboardSelection<'_> {
    fn page_url(&self, page: u64) -> String {
        let link = DashboardLink {
            month: self.month.to_string(),
            search: self.search,
            page,
        };

        match serde_urlencoded::to_string(&link) {
            Ok(query) => format!("{}?{query}", endpoints::DASHBOARD_VIEW),
            Err(error) => {
                tracing::error!("could not encode dashboard link: {error}");
                endpoints::DASHBOARD_VIEW.to_owned()
            }
        }
    }
}

/// Display a month of transactions with its statistics and charts.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    query: Result<Query<DashboardQuery>, QueryRejection>,
) -> Response {
    let rendered = query
        .map_err(Error::from)
        .and_then(|Query(query)| render_dashboard(&state, &query));

    match rendered {
        Ok(page) => page.into_response(),
        Err(error) => dashboard_error_response(error),
    }
}

fn render_dashboard(state: &DashboardState, query: &DashboardQuery) -> Result<Markup, Error> {
    let month = match query.month.as_deref() {
        Some(name) => parse_month(name)?,
        None => Month::January,
    };
    let search = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|search| !search.is_empty());
    let selection = DashboardSelection {
        month,
        search,
        page: query.page.unwrap_or(state.pagination_config.default_page),
    };

    let data = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        compose_combined_data(month, search, selection.page, &connection)
            .inspect_err(|error| tracing::error!("could not get dashboard data: {error}"))?
    };

    Ok(dashboard_view(&selection, &data, &state.pagination_config))
}

fn dashboard_error_response(error: Error) -> Response {
    let status = error.status_code();

    let (description, fix) = match &error {
        Error::InvalidMonth(_) | Error::InvalidQuery(_) | Error::InvalidPagination(_) => {
            (error.to_string(), "Check the month and page number and try again.")
        }
        error => {
            tracing::error!("could not render dashboard: {error}");
            (
                "Sorry, something went wrong.".to_owned(),
                "Try again later or check the server logs.",
            )
        }
    };

    let header = status.as_u16().to_string();

    (status, error_view("Error", &header, &description, fix)).into_response()
}

/// The search form with the month selector.
fn filter_form(selection: &DashboardSelection) -> Markup {
    html! {
        form
            method="get"
            action=(endpoints::DASHBOARD_VIEW)
            class="w-full flex flex-col md:flex-row gap-4 items-end mb-6"
        {
            div {
                label for="month" class=(FORM_LABEL_STYLE) { "Month" }
                select id="month" name="month" class=(FORM_TEXT_INPUT_STYLE) {
                    @for month in all_months() {
                        option value=(month) selected[month == selection.month] { (month) }
                    }
                }
            }

            div class="grow" {
                label for="search" class=(FORM_LABEL_STYLE) { "Search" }
                input
                    type="search"
                    id="search"
                    name="search"
                    placeholder="Title, description or category"
                    value=(selection.search.unwrap_or_default())
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Apply" }
        }
    }
}

/// Shown in place of the table and charts when nothing matches.
fn no_transactions_view(selection: &DashboardSelection) -> Markup {
    let clear_search = DashboardSelection {
        search: None,
        page: 1,
        ..*selection
    };

    html! {
        div id="no-transactions" class="text-center my-8" {
            h2 class="text-xl font-bold" { "No transactions" }

            p {
                "No transactions were found for " (selection.month)
                @if selection.search.is_some() {
                    " that match your search. "
                    (link(&clear_search.page_url(1), "Clear the search"))
                    " to see every transaction in " (selection.month) "."
                } @else {
                    "."
                }
            }
        }
    }
}

fn dashboard_view(
    selection: &DashboardSelection,
    data: &CombinedData,
    pagination_config: &PaginationConfig,
) -> Markup {
    let has_matches = data.total > 0;
    let charts = if has_matches {
        vec![
            DashboardChart {
                id: PRICE_RANGE_CHART_ID,
                options: price_range_chart(&data.bar_chart_data).to_string(),
            },
            DashboardChart {
                id: CATEGORY_CHART_ID,
                options: category_chart(&data.pie_chart_data).to_string(),
            },
        ]
    } else {
        Vec::new()
    };

    let indicators = create_pagination_indicators(
        selection.page,
        page_count(data.total, COMBINED_PAGE_SIZE),
        pagination_config.max_pages,
    );

    let content = html!(
        div
            id="dashboard-content"
            class={(PAGE_CONTAINER_STYLE) " max-w-screen-xl"}
        {
            h1 class="text-3xl font-bold mb-6" { "Transactions Dashboard" }

            (filter_form(selection))

            (statistics_cards_view(&data.statistics))

            @if has_matches {
                section id="transactions" class="w-full mb-6" {
                    h2 class="text-2xl font-bold mb-4" { "Transactions" }

                    @if data.transactions.is_empty() {
                        p { "There are no transactions on page " (selection.page) "." }
                    } @else {
                        (transactions_table(&data.transactions))
                    }

                    @if data.total > COMBINED_PAGE_SIZE || selection.page > 1 {
                        (pagination_view(&indicators, |page| selection.page_url(page)))
                    }
                }

                (charts_view(&charts))
            } @else {
                (no_transactions_view(selection))
            }
        }
    );

    let scripts = if has_matches {
        vec![
            HeadElement::ScriptLink(ECHARTS_SCRIPT_URL.to_owned()),
            charts_script(&charts),
        ]
    } else {
        Vec::new()
    };

    base("Dashboard", &scripts, &content)
}
