use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        kots::{
            CancelKotItemsRequest, CanceledItemList, CreateKotRequest, DailyItemList,
            DailyItemQuantity, KotItemInput,
        },
        orders::{
            CreateOrderRequest, MergeResult, MergeTablesRequest, OrderItemInput,
            OrderWithTableName, UpdateOrderRequest,
        },
        reports::{
            MenuStatistic, MenuStatistics, MenuwiseSummary, MonthTotal, NextOrderNumber,
            PaymentSummary, TemporaryOrdersCount, TotalAmountsByMonth, TotalForCurrentDate,
            TotalForPreviousMonth,
        },
        stock::{AvailableQuantity, ItemQuantity, ItemQuantityList, RemainingQuantity},
    },
    entity::sea_orm_active_enums::OrderState,
    models::{Kot, KotItem, Order, OrderItem, StockLevel},
    response::MessageResponse,
    routes::{health, kots, orders, params, stock},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        orders::create_order,
        orders::open_orders_for_table,
        orders::delete_order,
        orders::update_order_by_table,
        orders::update_order_by_id,
        orders::update_order_by_number,
        orders::list_orders,
        orders::finalized_orders,
        orders::merged_orders,
        orders::menu_statistics,
        orders::get_order_by_number,
        orders::latest_orders,
        orders::menuwise,
        orders::next_order_number,
        orders::temporary_orders_count,
        orders::total_for_current_date,
        orders::total_for_previous_month,
        orders::totals_by_month,
        orders::payment_summary,
        orders::saved_bills,
        orders::merge_tables,
        orders::apply_settlement,
        orders::mark_for_settle,
        kots::create_kot,
        kots::latest_kot,
        kots::settle_kots,
        kots::cancel_kot_items,
        kots::top_items_today,
        kots::daily_items,
        kots::daily_canceled_items,
        stock::low_stock,
        stock::available_quantity,
        stock::remaining_quantities,
        stock::top_consumed
    ),
    components(
        schemas(
            health::HealthData,
            Order,
            OrderItem,
            OrderState,
            Kot,
            KotItem,
            StockLevel,
            MessageResponse,
            OrderItemInput,
            CreateOrderRequest,
            UpdateOrderRequest,
            MergeTablesRequest,
            MergeResult,
            OrderWithTableName,
            KotItemInput,
            CreateKotRequest,
            CancelKotItemsRequest,
            DailyItemQuantity,
            DailyItemList,
            CanceledItemList,
            ItemQuantity,
            ItemQuantityList,
            AvailableQuantity,
            RemainingQuantity,
            NextOrderNumber,
            TemporaryOrdersCount,
            TotalForCurrentDate,
            TotalForPreviousMonth,
            MonthTotal,
            TotalAmountsByMonth,
            PaymentSummary,
            MenuStatistic,
            MenuStatistics,
            MenuwiseSummary,
            params::DateRangeQuery,
            params::MenuwiseQuery,
            params::TopConsumedQuery,
            params::AvailableQuantityQuery
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Orders", description = "Order lifecycle endpoints"),
        (name = "Settlement", description = "Settlement flag workflow"),
        (name = "Reports", description = "Sales aggregations"),
        (name = "KOT", description = "Kitchen order ticket endpoints"),
        (name = "Stock", description = "Inventory endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
