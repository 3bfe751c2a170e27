use serde::{Deserialize, Serialize};

use shopbook_core::{AccountId, Balance, Entity};

/// A customer account with its two running balances.
///
/// - `due`: what the customer owes the shop.
/// - `debt`: what the shop owes the customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    id: AccountId,
    #[serde(rename = "display_name")]
    name: String,
    #[serde(rename = "contact_handle")]
    contact: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    address: Option<String>,
    #[serde(rename = "due_balance", default)]
    due: Balance,
    #[serde(rename = "debt_balance", default)]
    debt: Balance,
}

impl Account {
    /// A freshly opened account: zero due, zero debt.
    pub fn open(
        id: AccountId,
        name: impl Into<String>,
        contact: impl Into<String>,
        address: Option<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            contact: contact.into(),
            address,
            due: Balance::ZERO,
            debt: Balance::ZERO,
        }
    }

    /// Copy of this account carrying new balances; identity and details are kept.
    pub fn with_balances(&self, due: Balance, debt: Balance) -> Self {
        Self {
            due,
            debt,
            ..self.clone()
        }
    }

    pub fn id_typed(&self) -> AccountId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contact(&self) -> &str {
        &self.contact
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn due(&self) -> Balance {
        self.due
    }

    pub fn debt(&self) -> Balance {
        self.debt
    }

    /// Case-insensitive name comparison used for uniqueness and lookups.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.trim().to_lowercase() == name.trim().to_lowercase()
    }
}

impl Entity for Account {
    type Id = AccountId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
