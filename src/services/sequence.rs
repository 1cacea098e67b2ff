use sea_orm::{ConnectionTrait, EntityTrait, FromQueryResult, Statement};

use crate::{
    entity::OrderSequences,
    error::{AppError, AppResult},
};

const ORDER_SEQUENCE: &str = "orders";

#[derive(Debug, FromQueryResult)]
struct SequenceValue {
    value: i64,
}

/// Atomically bump the order counter and return the new human-facing number.
///
/// Must run inside the transaction that inserts the order so an aborted
/// creation does not burn a number.
pub async fn next_order_number<C: ConnectionTrait>(conn: &C) -> AppResult<String> {
    let row = SequenceValue::find_by_statement(Statement::from_sql_and_values(
        conn.get_database_backend(),
        r#"
        INSERT INTO order_sequences (name, value)
        VALUES ($1, 1)
        ON CONFLICT (name) DO UPDATE SET value = order_sequences.value + 1
        RETURNING value
        "#,
        [ORDER_SEQUENCE.into()],
    ))
    .one(conn)
    .await?
    .ok_or_else(|| AppError::Internal(anyhow::anyhow!("order sequence returned no row")))?;

    Ok(format_order_number(row.value))
}

/// The number the next created order will receive. Nothing is reserved.
pub async fn peek_next_order_number<C: ConnectionTrait>(conn: &C) -> AppResult<String> {
    let current = OrderSequences::find_by_id(ORDER_SEQUENCE.to_owned())
        .one(conn)
        .await?
        .map(|seq| seq.value)
        .unwrap_or(0);
    Ok(format_order_number(current + 1))
}

fn format_order_number(value: i64) -> String {
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::format_order_number;

    #[test]
    fn order_numbers_are_plain_decimal_strings() {
        assert_eq!(format_order_number(1), "1");
        assert_eq!(format_order_number(1042), "1042");
    }
}
