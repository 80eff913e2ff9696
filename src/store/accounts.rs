//! Account persistence - named buckets of entries with a derived balance.
//!
//! Deleting an account does not cascade to its entries: the entries survive
//! with their account reference nulled out, inside one transaction. The
//! ledger history is append-only; removing a bucket must not silently erase
//! the events recorded against it.

use crate::{
    entities::{Account, Entry, account, entry},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::info;

/// Inserts a new account for the given user.
pub async fn insert_account<C: ConnectionTrait>(
    db: &C,
    user_id: i64,
    name: &str,
    initial_balance: f64,
) -> Result<account::Model> {
    let model = account::ActiveModel {
        user_id: Set(user_id),
        name: Set(name.to_string()),
        initial_balance: Set(initial_balance),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Finds an account by id, scoped to its owner. Returns None for accounts
/// that do not exist or belong to another user.
pub async fn get_account<C: ConnectionTrait>(
    db: &C,
    user_id: i64,
    account_id: i64,
) -> Result<Option<account::Model>> {
    Account::find_by_id(account_id)
        .filter(account::Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists all accounts of the user, ordered by name ascending.
pub async fn list_accounts(db: &DatabaseConnection, user_id: i64) -> Result<Vec<account::Model>> {
    Account::find()
        .filter(account::Column::UserId.eq(user_id))
        .order_by_asc(account::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Computes the current balance of an account on read:
/// `initial_balance + sum(net_base of referencing entries)`, with a 0.0
/// contribution when no entries reference it.
pub async fn current_balance(db: &DatabaseConnection, account_id: i64) -> Result<f64> {
    let account = Account::find_by_id(account_id)
        .one(db)
        .await?
        .ok_or(Error::AccountNotFound { id: account_id })?;

    let net: Option<Option<f64>> = Entry::find()
        .select_only()
        .column_as(entry::Column::NetBase.sum(), "total")
        .filter(entry::Column::AccountId.eq(account_id))
        .into_tuple()
        .one(db)
        .await?;

    Ok(account.initial_balance + net.flatten().unwrap_or(0.0))
}

/// Deletes an account, orphaning its entries.
///
/// The entries' `account_id` is set to NULL and the account row removed in a
/// single transaction, so no entry ever references a missing account.
pub async fn delete_account(db: &DatabaseConnection, user_id: i64, account_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let account = Account::find_by_id(account_id)
        .filter(account::Column::UserId.eq(user_id))
        .one(&txn)
        .await?
        .ok_or(Error::AccountNotFound { id: account_id })?;

    Entry::update_many()
        .col_expr(entry::Column::AccountId, Expr::value(None::<i64>))
        .filter(entry::Column::AccountId.eq(account_id))
        .filter(entry::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;

    account.delete(&txn).await?;
    txn.commit().await?;

    info!(account_id, user_id, "account deleted, entries orphaned");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::entities::Direction;
    use crate::store::entries::{EntryFilter, EntryOrder, list_entries};
    use crate::test_utils::{
        create_custom_account, create_test_account, date, record_account_entry, setup_test_db,
        setup_with_user,
    };

    #[tokio::test]
    async fn test_current_balance_without_entries_is_initial() -> Result<()> {
        let (db, user) = setup_with_user().await?;
        let account = create_custom_account(&db, user.id, "Savings", 250.5).await?;

        let balance = current_balance(&db, account.id).await?;
        assert_eq!(balance, 250.5);

        Ok(())
    }

    #[tokio::test]
    async fn test_current_balance_with_entries() -> Result<()> {
        let (db, user) = setup_with_user().await?;
        let account = create_custom_account(&db, user.id, "Checking", 100.0).await?;

        record_account_entry(&db, user.id, account.id, date(2024, 5, 1), Direction::Income, 50.0)
            .await?;
        record_account_entry(&db, user.id, account.id, date(2024, 5, 2), Direction::Expense, 30.0)
            .await?;

        let balance = current_balance(&db, account.id).await?;
        assert_eq!(balance, 120.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_current_balance_missing_account() -> Result<()> {
        let (db, _user) = setup_with_user().await?;

        let result = current_balance(&db, 999).await;
        assert!(matches!(result, Err(Error::AccountNotFound { id: 999 })));

        Ok(())
    }

    #[tokio::test]
    async fn test_list_accounts_ordered_by_name() -> Result<()> {
        let (db, user) = setup_with_user().await?;
        create_test_account(&db, user.id, "Wallet").await?;
        create_test_account(&db, user.id, "Bank").await?;

        let accounts = list_accounts(&db, user.id).await?;
        let names: Vec<&str> = accounts.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Bank", "Wallet"]);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_account_orphans_entries() -> Result<()> {
        let (db, user) = setup_with_user().await?;
        let account = create_test_account(&db, user.id, "Doomed").await?;

        let entry =
            record_account_entry(&db, user.id, account.id, date(2024, 5, 1), Direction::Income, 10.0)
                .await?;
        assert_eq!(entry.account_id, Some(account.id));

        delete_account(&db, user.id, account.id).await?;

        assert!(get_account(&db, user.id, account.id).await?.is_none());

        // The entry survives with its account reference nulled
        let survivors =
            list_entries(&db, user.id, &EntryFilter::default(), EntryOrder::NewestFirst).await?;
        assert_eq!(survivors.len(), 1);
        assert_eq!(survivors[0].id, entry.id);
        assert_eq!(survivors[0].account_id, None);
        assert_eq!(survivors[0].net_base, 10.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_account_ownership_checked() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = crate::store::users::insert_user(&db, "alice@example.com").await?;
        let bob = crate::store::users::insert_user(&db, "bob@example.com").await?;

        let account = create_test_account(&db, alice.id, "Alice's").await?;

        let result = delete_account(&db, bob.id, account.id).await;
        assert!(matches!(result, Err(Error::AccountNotFound { .. })));
        assert!(get_account(&db, alice.id, account.id).await?.is_some());

        Ok(())
    }
}
