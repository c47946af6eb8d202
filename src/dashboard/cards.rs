//! Card components for the sale totals of a month.

use maud::{Markup, html};

use crate::{aggregation::Statistics, html::format_currency};

const CARD_STYLE: &str = "p-4 rounded-lg shadow bg-white dark:bg-gray-800";

/// Renders the total sale amount and the sold and not sold counts as cards.
pub(super) fn statistics_cards_view(statistics: &Statistics) -> Markup {
    let cards = [
        (
            "Total Sale Amount",
            format_currency(statistics.total_sale_amount),
        ),
        (
            "Total Sold Items",
            statistics.total_sold_items.to_string(),
        ),
        (
            "Total Not Sold Items",
            statistics.total_not_sold_items.to_string(),
        ),
    ];

    html! {
        section id="statistics" class="w-full mx-auto mb-6" {
            h2 class="text-2xl font-bold mb-4" { "Statistics" }

            div class="grid grid-cols-1 md:grid-cols-3 gap-4" {
                @for (label, value) in cards {
                    div class=(CARD_STYLE) data-statistic=(label) {
                        p class="font-semibold" { (label) }
                        p class="text-2xl" { (value) }
                    }
                }
            }
        }
    }
}
