//! Desktop notifications mirroring the in-app toasts

use crate::editor::{Notice, NoticeKind};

pub fn notify(notice: &Notice) {
    let (icon, urgency) = match notice.kind {
        NoticeKind::Success => ("dialog-information", notify_rust::Urgency::Low),
        NoticeKind::Error => ("dialog-error", notify_rust::Urgency::Normal),
    };

    if let Err(e) = notify_rust::Notification::new()
        .summary("catnames")
        .body(&notice.message)
        .icon(icon)
        .urgency(urgency)
        .show()
    {
        tracing::debug!("Desktop notification failed: {}", e);
    }
}
