//! Admin product management.

use crate::auth::AuthGate;
use crate::catalog::CatalogStore;
use crate::error::StoreResult;
use crate::notifications::NotificationBus;
use std::sync::Arc;
use suko_commerce::catalog::{CatalogStats, Product, ProductForm};
use suko_commerce::search::{apply_filters, Filter};
use suko_commerce::ProductId;

const CREATED_MESSAGE: &str = "Product created successfully!";
const UPDATED_MESSAGE: &str = "Product updated successfully!";
const SAVE_FAILED_MESSAGE: &str = "Error saving product. Please try again.";
const DELETED_MESSAGE: &str = "Product deleted successfully!";
const DELETE_FAILED_MESSAGE: &str = "Error deleting product. Please try again.";

/// Catalog editing for a signed-in admin.
///
/// Every operation fails with `AuthError::NotAuthenticated` while no admin
/// is signed in; nothing is shown on the bus in that case.
#[derive(Debug, Clone)]
pub struct AdminDashboard {
    auth: AuthGate,
    catalog: Arc<CatalogStore>,
    bus: NotificationBus,
}

impl AdminDashboard {
    pub fn new(auth: AuthGate, catalog: Arc<CatalogStore>, bus: NotificationBus) -> Self {
        Self { auth, catalog, bus }
    }

    /// Create a product, or overwrite `editing` with the form contents.
    ///
    /// Returns the id of the saved product. Invalid input and store errors
    /// both show the save failure message.
    pub async fn save(
        &self,
        form: &ProductForm,
        editing: Option<&ProductId>,
    ) -> StoreResult<ProductId> {
        let admin = self.auth.require()?;

        let result = match form.to_draft() {
            Ok(draft) => match editing {
                Some(id) => self.catalog.replace(id, draft).await.map(|()| id.clone()),
                None => self.catalog.add(draft).await,
            },
            Err(e) => Err(e.into()),
        };

        match &result {
            Ok(id) => {
                tracing::info!(product_id = %id, admin = %admin.uid, "product saved");
                self.bus.success(if editing.is_some() {
                    UPDATED_MESSAGE
                } else {
                    CREATED_MESSAGE
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "saving product failed");
                self.bus.error(SAVE_FAILED_MESSAGE);
            }
        }
        result
    }

    pub async fn delete(&self, id: &ProductId) -> StoreResult<()> {
        let admin = self.auth.require()?;

        let result = self.catalog.delete(id).await;
        match &result {
            Ok(()) => {
                tracing::info!(product_id = %id, admin = %admin.uid, "product removed by admin");
                self.bus.success(DELETED_MESSAGE);
            }
            Err(e) => {
                tracing::warn!(product_id = %id, error = %e, "deleting product failed");
                self.bus.error(DELETE_FAILED_MESSAGE);
            }
        }
        result
    }

    /// A form prefilled from an existing product.
    pub fn edit_form(&self, id: &ProductId) -> StoreResult<Option<ProductForm>> {
        self.auth.require()?;
        Ok(self
            .catalog
            .get_by_id(id.as_str())
            .map(|product| ProductForm::from_product(&product)))
    }

    pub fn stats(&self) -> StoreResult<CatalogStats> {
        self.auth.require()?;
        Ok(self.catalog.stats())
    }

    /// Products whose name, description or category contains `term`,
    /// optionally limited to one category. A blank term matches everything.
    pub fn filtered(&self, term: &str, category: Option<&str>) -> StoreResult<Vec<Product>> {
        self.auth.require()?;

        let mut filters = vec![Filter::text(term.trim())];
        if let Some(category) = category.filter(|c| !c.is_empty()) {
            filters.push(Filter::category(category));
        }
        Ok(apply_filters(&self.catalog.all(), &filters))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, ManualClock};
    use crate::error::StoreError;
    use crate::notifications::NotificationKind;
    use serde_json::json;
    use suko_auth::{MockCredentials, MOCK_ADMIN_EMAIL, MOCK_ADMIN_PASSWORD};
    use suko_cache::Cache;
    use suko_db::{Db, MemoryDatabase};

    struct Fixture {
        db: MemoryDatabase,
        auth: AuthGate,
        catalog: Arc<CatalogStore>,
        bus: NotificationBus,
        admin: AdminDashboard,
    }

    fn fixture() -> Fixture {
        let db = MemoryDatabase::with_tree(json!({"products": {
            "a": {"name": "Pigment Dyed Tee", "price": 48.0, "category": "tees", "featured": true},
            "b": {"name": "Wool Beanie", "price": 30.0, "category": "headwear", "description": "Soft merino"}
        }}));
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(1_700_000_000_000));
        let catalog = Arc::new(CatalogStore::connect(Db::new(db.clone()), clock));
        let auth = AuthGate::new(Arc::new(MockCredentials::default()), Cache::memory());
        let bus = NotificationBus::new();
        let admin = AdminDashboard::new(auth.clone(), catalog.clone(), bus.clone());
        Fixture {
            db,
            auth,
            catalog,
            bus,
            admin,
        }
    }

    async fn signed_in() -> Fixture {
        let f = fixture();
        f.auth
            .login(MOCK_ADMIN_EMAIL, MOCK_ADMIN_PASSWORD)
            .await
            .unwrap();
        f.catalog
            .subscribe()
            .wait_for(|products| products.len() == 2)
            .await;
        f
    }

    fn form(name: &str, price: &str) -> ProductForm {
        let mut form = ProductForm::new();
        form.name = name.into();
        form.price = price.parse().unwrap();
        form.category = "tees".into();
        form.sizes_input = "S, M, ,L".into();
        form
    }

    fn last_message(bus: &NotificationBus) -> (String, NotificationKind) {
        let message = bus.messages().pop().unwrap();
        (message.message, message.kind)
    }

    #[tokio::test]
    async fn test_requires_admin() {
        let f = fixture();
        let err = f.admin.save(&form("X", "1"), None).await.unwrap_err();
        assert!(err.is_not_authenticated());
        assert!(f.admin.stats().unwrap_err().is_not_authenticated());
        assert!(f.admin.filtered("", None).is_err());
        assert!(f.admin.delete(&ProductId::new("a")).await.is_err());
        assert!(f.bus.messages().is_empty());
    }

    #[tokio::test]
    async fn test_create_product() {
        let f = signed_in().await;
        let id = f.admin.save(&form("Boxy Tee", "55"), None).await.unwrap();

        assert_eq!(
            last_message(&f.bus),
            (CREATED_MESSAGE.to_string(), NotificationKind::Success)
        );
        let record = &f.db.snapshot()["products"][id.as_str()];
        assert_eq!(record["name"], "Boxy Tee");
        assert_eq!(record["sizes"], json!(["S", "M", "L"]));
        assert_eq!(record["createdAt"], 1_700_000_000_000i64);
    }

    #[tokio::test]
    async fn test_update_product() {
        let f = signed_in().await;
        let id = ProductId::new("b");
        let mut edit = f.admin.edit_form(&id).unwrap().unwrap();
        assert_eq!(edit.name, "Wool Beanie");
        edit.description.clear();
        edit.price = 25.0;

        assert_eq!(f.admin.save(&edit, Some(&id)).await.unwrap(), id);
        assert_eq!(
            last_message(&f.bus),
            (UPDATED_MESSAGE.to_string(), NotificationKind::Success)
        );
        let record = &f.db.snapshot()["products"]["b"];
        assert_eq!(record["price"], 25.0);
        assert!(record.get("description").is_none());
    }

    #[tokio::test]
    async fn test_save_failures_are_reported() {
        let f = signed_in().await;

        let err = f.admin.save(&form("", "10"), None).await.unwrap_err();
        assert!(err.is_user_error());
        assert_eq!(
            last_message(&f.bus),
            (SAVE_FAILED_MESSAGE.to_string(), NotificationKind::Error)
        );

        f.db.set_read_only(true);
        let err = f.admin.save(&form("Tee", "10"), None).await.unwrap_err();
        assert!(matches!(err, StoreError::Database(_)));
        assert_eq!(last_message(&f.bus).0, SAVE_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn test_delete_product() {
        let f = signed_in().await;
        f.admin.delete(&ProductId::new("a")).await.unwrap();
        assert_eq!(last_message(&f.bus).0, DELETED_MESSAGE);

        f.db.set_read_only(true);
        assert!(f.admin.delete(&ProductId::new("b")).await.is_err());
        assert_eq!(
            last_message(&f.bus),
            (DELETE_FAILED_MESSAGE.to_string(), NotificationKind::Error)
        );
    }

    #[tokio::test]
    async fn test_stats_and_filtering() {
        let f = signed_in().await;
        let stats = f.admin.stats().unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.featured, 1);

        assert_eq!(f.admin.filtered("", None).unwrap().len(), 2);
        assert_eq!(f.admin.filtered("MERINO", None).unwrap()[0].name, "Wool Beanie");
        assert!(f.admin.filtered("tee", Some("headwear")).unwrap().is_empty());
        assert_eq!(f.admin.filtered(" ", Some("tees")).unwrap().len(), 1);
    }
}
