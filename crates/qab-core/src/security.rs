use crate::domain::UserId;

// ============== Authorization ==============

/// Only the configured admin identity may open the panel or mutate activations.
///
/// An unset admin (`0`) authorizes nobody.
pub fn is_admin(user_id: Option<UserId>, admin_user_id: i64) -> bool {
    let Some(user_id) = user_id else {
        return false;
    };
    if admin_user_id == 0 {
        return false;
    }
    user_id.0 == admin_user_id
}
