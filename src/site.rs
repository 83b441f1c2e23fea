//! SauceDemo page geography: the URLs and CSS selectors the journey touches.

/// Default target site.
pub const BASE_URL: &str = "https://www.saucedemo.com";

/// Path fragment of the post-login landing page.
pub const INVENTORY_PATH: &str = "/inventory.html";

/// Path fragment of the cart page.
pub const CART_PATH: &str = "/cart.html";

pub mod selectors {
    pub const USERNAME_INPUT: &str = "#user-name";
    pub const PASSWORD_INPUT: &str = "#password";
    pub const LOGIN_BUTTON: &str = "#login-button";

    pub const INVENTORY_ITEM: &str = ".inventory_item";
    pub const INVENTORY_ITEM_NAME: &str = ".inventory_item_name";
    /// Add-to-cart button on the product detail page.
    pub const ADD_TO_CART_BUTTON: &str = ".btn_inventory";

    pub const CART_LINK: &str = ".shopping_cart_link";
    pub const CART_LIST: &str = ".cart_list";
    pub const CART_ITEM: &str = ".cart_item";

    pub const MENU_BUTTON: &str = "#menu_button_container .bm-burger-button";
    pub const LOGOUT_LINK: &str = "#logout_sidebar_link";
}

/// Selector for the product tile at `index` in the inventory listing.
pub fn inventory_item_at(index: usize) -> String {
    format!("{} >> nth={}", selectors::INVENTORY_ITEM, index)
}

/// Selector for the name link inside the product tile at `index`.
pub fn inventory_item_name_at(index: usize) -> String {
    format!(
        "{} >> nth={} >> {}",
        selectors::INVENTORY_ITEM,
        index,
        selectors::INVENTORY_ITEM_NAME
    )
}

/// Selector for the remove button of the cart row at `index`.
pub fn cart_remove_button_at(index: usize) -> String {
    format!("{} >> nth={} >> .btn_secondary", selectors::CART_ITEM, index)
}
