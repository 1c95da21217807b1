//! Reply templates.
//!
//! The audience is Arabic-speaking, so every user-visible string lives here.

use crate::{
    domain::{Stats, UserSummary},
    messaging::types::{InlineKeyboard, Reply},
};

pub const START_FAILED: &str = "حدث خطأ أثناء التحقق من حسابك. يرجى المحاولة لاحقاً.";
pub const PANEL_UNAUTHORIZED: &str = "غير مصرح لك بالوصول إلى لوحة التحكم.";
pub const ACTION_UNAUTHORIZED: &str = "غير مصرح لك بهذه العملية.";

pub const NO_INACTIVE_USERS: &str = "لا يوجد مستخدمين غير مفعلين.";
pub const NO_USERS: &str = "لا يوجد مستخدمين مسجلين.";
pub const FETCH_FAILED: &str = "حدث خطأ أثناء جلب البيانات.";
pub const STATS_FAILED: &str = "حدث خطأ أثناء جلب الإحصائيات.";

pub const ACTIVATION_NOTICE: &str =
    "🎉 تهانينا! تم تفعيل حسابك بنجاح.\nيمكنك الآن الوصول إلى جميع الاختبارات.";
pub const ACTIVATED_WITHOUT_USER: &str = "تم التفعيل لكن لم يتم العثور على بيانات المستخدم.";
pub const ACTIVATE_FAILED: &str = "فشل في تفعيل المستخدم.";
pub const ACTIVATE_ERROR: &str = "حدث خطأ أثناء تفعيل المستخدم.";
pub const DEACTIVATED: &str = "❌ تم إلغاء تفعيل المستخدم بنجاح!";
pub const DEACTIVATE_FAILED: &str = "فشل في إلغاء تفعيل المستخدم.";
pub const DEACTIVATE_ERROR: &str = "حدث خطأ أثناء إلغاء تفعيل المستخدم.";

const UNSPECIFIED: &str = "غير محدد";
const BACK: &str = "العودة";

pub fn start_active(first_name: &str) -> String {
    format!("مرحباً {first_name}! 🎉\nحسابك مفعل بالفعل ويمكنك الوصول إلى الاختبارات.")
}

pub fn start_pending(first_name: &str) -> String {
    format!(
        "مرحباً {first_name}! 👋\nحسابك مسجل لكنه غير مفعل حالياً.\nيرجى انتظار موافقة الأدمن على تفعيل حسابك."
    )
}

pub fn start_unknown(first_name: &str) -> String {
    format!(
        "مرحباً {first_name}! 👋\nلم يتم العثور على حسابك في النظام.\nيرجى تسجيل الدخول أولاً من خلال الموقع الإلكتروني."
    )
}

pub fn activated(display_name: &str) -> String {
    format!("✅ تم تفعيل المستخدم {display_name} بنجاح!")
}

pub fn admin_panel() -> Reply {
    let mut kb = InlineKeyboard::default();
    kb.push("عرض المستخدمين غير المفعلين", "show_inactive");
    kb.push("عرض جميع المستخدمين", "show_all");
    kb.push("إحصائيات", "stats");
    Reply::with_keyboard("🔧 لوحة تحكم الأدمن\nاختر العملية المطلوبة:", kb)
}

fn back_only() -> InlineKeyboard {
    let mut kb = InlineKeyboard::default();
    kb.push(BACK, "back_to_admin");
    kb
}

fn user_lines(out: &mut String, s: &UserSummary, status: Option<&str>) {
    let name = s
        .user
        .username
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or(UNSPECIFIED);
    match status {
        Some(status) => out.push_str(&format!("🔸 {name} - {status}\n")),
        None => out.push_str(&format!("🔸 {name}\n")),
    }
    out.push_str(&format!("   ID: {}\n", s.user.telegram_id));
    out.push_str(&format!("   تاريخ التسجيل: {}\n\n", s.user.registered_on()));
}

/// Inactive users, one `activate_<id>` button each.
pub fn inactive_users(users: &[UserSummary]) -> Reply {
    if users.is_empty() {
        return Reply::text(NO_INACTIVE_USERS);
    }

    let mut text = String::from("👥 المستخدمين غير المفعلين:\n\n");
    let mut kb = InlineKeyboard::default();
    for s in users {
        user_lines(&mut text, s, None);
        kb.push(
            format!("تفعيل {}", s.user.display_name()),
            format!("activate_{}", s.user.id),
        );
    }
    kb.push(BACK, "back_to_admin");

    Reply::with_keyboard(text, kb)
}

/// Every user with status, a summary block, and `deactivate_<id>` for active users.
pub fn all_users(users: &[UserSummary]) -> Reply {
    if users.is_empty() {
        return Reply::text(NO_USERS);
    }

    let mut text = String::from("👥 جميع المستخدمين:\n\n");
    let mut kb = InlineKeyboard::default();
    let mut active = 0usize;
    for s in users {
        let status = if s.is_active {
            active += 1;
            "✅ مفعل"
        } else {
            "❌ غير مفعل"
        };
        user_lines(&mut text, s, Some(status));
        if s.is_active {
            kb.push(
                format!("إلغاء تفعيل {}", s.user.display_name()),
                format!("deactivate_{}", s.user.id),
            );
        }
    }
    let inactive = users.len() - active;

    text.push_str("\n📊 الإحصائيات:\n");
    text.push_str(&format!("✅ المفعلين: {active}\n"));
    text.push_str(&format!("❌ غير المفعلين: {inactive}\n"));
    text.push_str(&format!("📈 المجموع: {}", users.len()));

    kb.push(BACK, "back_to_admin");
    Reply::with_keyboard(text, kb)
}

pub fn stats(stats: Stats) -> Reply {
    let mut text = String::from("📊 إحصائيات النظام:\n\n");
    text.push_str(&format!("👥 إجمالي المستخدمين: {}\n", stats.total));
    text.push_str(&format!("✅ المستخدمين المفعلين: {}\n", stats.active));
    text.push_str(&format!("❌ المستخدمين غير المفعلين: {}\n", stats.inactive()));
    if let Some(rate) = stats.activation_rate() {
        text.push_str(&format!("📈 معدل التفعيل: {rate:.1}%"));
    }
    Reply::with_keyboard(text, back_only())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RowId, UserRecord};

    fn summary(id: &str, tg: i64, username: Option<&str>, is_active: bool) -> UserSummary {
        UserSummary {
            user: UserRecord {
                id: RowId(id.to_string()),
                telegram_id: tg,
                username: username.map(str::to_string),
                created_at: Some("2024-11-30T12:00:00Z".to_string()),
            },
            is_active,
        }
    }

    #[test]
    fn panel_offers_the_three_admin_actions() {
        let r = admin_panel();
        assert_eq!(
            r.keyboard.unwrap().callback_data(),
            vec!["show_inactive", "show_all", "stats"]
        );
    }

    #[test]
    fn inactive_listing_falls_back_to_telegram_id_for_buttons() {
        let r = inactive_users(&[summary("9", 777, None, false)]);
        assert!(r.text.contains("🔸 غير محدد\n"));
        assert!(r.text.contains("   ID: 777\n"));
        assert!(r.text.contains("2024-11-30"));
        let kb = r.keyboard.unwrap();
        assert_eq!(kb.buttons[0].label, "تفعيل 777");
        assert_eq!(kb.callback_data(), vec!["activate_9", "back_to_admin"]);
    }

    #[test]
    fn all_users_summarizes_counts() {
        let r = all_users(&[
            summary("1", 10, Some("amal"), true),
            summary("2", 20, Some("omar"), false),
            summary("3", 30, None, false),
        ]);
        assert!(r.text.contains("🔸 amal - ✅ مفعل"));
        assert!(r.text.contains("🔸 omar - ❌ غير مفعل"));
        assert!(r.text.contains("✅ المفعلين: 1\n"));
        assert!(r.text.contains("❌ غير المفعلين: 2\n"));
        assert!(r.text.ends_with("📈 المجموع: 3"));
        assert_eq!(
            r.keyboard.unwrap().callback_data(),
            vec!["deactivate_1", "back_to_admin"]
        );
    }

    #[test]
    fn empty_listings_have_no_keyboard() {
        assert_eq!(inactive_users(&[]), Reply::text(NO_INACTIVE_USERS));
        assert_eq!(all_users(&[]), Reply::text(NO_USERS));
    }

    #[test]
    fn stats_rate_rounds_to_one_decimal() {
        let r = stats(Stats {
            total: 3,
            active: 2,
        });
        assert!(r.text.contains("👥 إجمالي المستخدمين: 3\n"));
        assert!(r.text.contains("❌ المستخدمين غير المفعلين: 1\n"));
        assert!(r.text.ends_with("📈 معدل التفعيل: 66.7%"));
    }

    #[test]
    fn stats_omit_rate_without_users() {
        let r = stats(Stats {
            total: 0,
            active: 0,
        });
        assert!(!r.text.contains("معدل التفعيل"));
        assert_eq!(r.keyboard.unwrap().callback_data(), vec!["back_to_admin"]);
    }
}
