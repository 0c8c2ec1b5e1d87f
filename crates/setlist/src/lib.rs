//! Purchase links for sealed products in the MTGJSON set list.
//!
//! Each set in `SetList.json` carries a `sealedProduct` array, and each
//! product a `purchaseUrls` object with at most one link per vendor. Only the
//! Card Kingdom and TCGplayer links are of interest here.

use serde_json::Value;

const CARD_KINGDOM: &str = "cardKingdom";
const TCG_PLAYER: &str = "tcgplayer";

/// Column headers matching the fields of [`PurchaseUrls`].
pub const COLUMNS: [&str; 2] = ["CARD_KINGDOM_URL", "TCG_PLAYER_URL"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurchaseUrls {
    pub card_kingdom: Option<String>,
    pub tcg_player: Option<String>,
}

impl PurchaseUrls {
    /// Read links from a flattened `purchaseUrls` cell.
    ///
    /// A cell is either a single-vendor object (`{"tcgplayer": "..."}`) or a
    /// list of them. Only the first entry of each object is looked at, and
    /// for a list later objects overwrite earlier ones. Anything else yields
    /// no links.
    pub fn from_cell(cell: &Value) -> Self {
        let mut urls = Self::default();
        match cell {
            Value::Object(_) => urls.apply_first_entry(cell),
            Value::Array(items) => items.iter().for_each(|item| urls.apply_first_entry(item)),
            _ => {},
        }
        urls
    }

    /// Read links from a sealed product object, using every entry of its
    /// `purchaseUrls`.
    pub fn from_product(product: &Value) -> Self {
        let urls = product.get("purchaseUrls");
        let link = |vendor: &str| urls.and_then(|urls| urls.get(vendor)).and_then(Value::as_str).map(String::from);
        Self {
            card_kingdom: link(CARD_KINGDOM),
            tcg_player: link(TCG_PLAYER),
        }
    }

    fn apply_first_entry(&mut self, cell: &Value) {
        let Some((vendor, url)) = cell.as_object().and_then(|entries| entries.iter().next()) else {
            return;
        };
        let url = url.as_str().map(String::from);
        match vendor.as_str() {
            CARD_KINGDOM => self.card_kingdom = url,
            TCG_PLAYER => self.tcg_player = url,
            _ => {},
        }
    }

    pub fn is_empty(&self) -> bool {
        self.card_kingdom.is_none() && self.tcg_player.is_none()
    }
}

/// Purchase links of one sealed product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductUrls {
    pub set_code: String,
    pub name: String,
    pub urls: PurchaseUrls,
}

/// Walk every `data[*].sealedProduct[*]` of a set list document.
///
/// Sets without sealed products are skipped; products missing a name get an
/// empty one rather than being dropped.
pub fn product_urls(set_list: &Value) -> Vec<ProductUrls> {
    let sets = set_list.get("data").and_then(Value::as_array).map(Vec::as_slice).unwrap_or_default();
    let products: Vec<ProductUrls> = sets
        .iter()
        .flat_map(|set| {
            let set_code = set.get("code").and_then(Value::as_str).unwrap_or_default();
            let sealed = set.get("sealedProduct").and_then(Value::as_array).map(Vec::as_slice).unwrap_or_default();
            sealed.iter().map(move |product| ProductUrls {
                set_code: set_code.to_string(),
                name: product.get("name").and_then(Value::as_str).unwrap_or_default().to_string(),
                urls: PurchaseUrls::from_product(product),
            })
        })
        .collect();
    tracing::debug!(sets = sets.len(), products = products.len(), "Collected sealed product links");
    products
}
