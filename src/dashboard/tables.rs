//! Table views for the transactions on the current dashboard page.

use maud::{Markup, html};

use crate::{
    html::{LINK_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency},
    pagination::PaginationIndicator,
    transaction::Transaction,
};

/// Renders one page of transactions as a table.
pub(super) fn transactions_table(transactions: &[Transaction]) -> Markup {
    html! {
        div class="overflow-x-auto rounded-lg shadow w-full" {
            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400" {
                thead class=(TABLE_HEADER_STYLE) {
                    tr {
                        th scope="col" class=(TABLE_CELL_STYLE) { "ID" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Title" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Price" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date of Sale" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Sold" }
                    }
                }
                tbody {
                    @for transaction in transactions {
                        tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id) {
                            td class=(TABLE_CELL_STYLE) { (transaction.id) }
                            td class=(TABLE_CELL_STYLE) { (transaction.title) }
                            td class=(TABLE_CELL_STYLE) { (transaction.description) }
                            td class={(TABLE_CELL_STYLE) " whitespace-nowrap"} {
                                (format_currency(transaction.price))
                            }
                            td class=(TABLE_CELL_STYLE) { (transaction.category) }
                            td class={(TABLE_CELL_STYLE) " whitespace-nowrap"} {
                                (transaction.date_of_sale.date())
                            }
                            td class=(TABLE_CELL_STYLE) {
                                @if transaction.sold { "Yes" } @else { "No" }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Renders links to other pages of the table.
///
/// `page_link` builds the URL of a page number.
pub(super) fn pagination_view(
    indicators: &[PaginationIndicator],
    page_link: impl Fn(u64) -> String,
) -> Markup {
    html! {
        nav class="pagination my-4" aria-label="Transaction pages" {
            ul class="flex items-center gap-2" {
                @for indicator in indicators {
                    li {
                        @match indicator {
                            PaginationIndicator::Page(page) => {
                                a href=(page_link(*page)) class=(LINK_STYLE) { (page) }
                            }
                            PaginationIndicator::CurrPage(page) => {
                                span aria-current="page" class="font-bold px-2" { (page) }
                            }
                            PaginationIndicator::Ellipsis => {
                                span { "..." }
                            }
                            PaginationIndicator::NextButton(page) => {
                                a href=(page_link(*page)) class=(LINK_STYLE) rel="next" { "Next" }
                            }
                            PaginationIndicator::BackButton(page) => {
                                a href=(page_link(*page)) class=(LINK_STYLE) rel="prev" { "Back" }
                            }
                        }
                    }
                }
            }
        }
    }
}
