use campustrade_common::Recipient;

/// A comment was left on a seller's product.
#[derive(Debug, Clone)]
pub struct CommentEvent {
    /// Product owner, the notification recipient.
    pub seller: Recipient,
    /// Commenter's display name.
    pub commenter: String,
    pub product: String,
    pub text: String,
    /// 1-5 rating attached to the comment.
    pub rating: u8,
}

/// A product was marked as a favorite.
#[derive(Debug, Clone)]
pub struct FavoriteEvent {
    pub seller: Recipient,
    /// Display name of the user who favorited.
    pub user: String,
    pub product: String,
}

/// A user expressed interest in a product.
#[derive(Debug, Clone)]
pub struct InterestEvent {
    pub seller: Recipient,
    /// Display name of the interested user.
    pub user: String,
    pub product: String,
}

/// A product's stock dropped below its threshold.
#[derive(Debug, Clone)]
pub struct LowStockEvent {
    pub seller: Recipient,
    pub product: String,
}
