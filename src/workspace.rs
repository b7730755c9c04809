// src/workspace.rs
use log::info;

use crate::data_types::{
    now_iso, record_id, Guest, GuestGroup, Message, MessageStatus, Wedding,
};
use crate::import::ImportResult;
use crate::store::{ListQuery, Session, Store, StoreError};

/// Groups provisioned with every new workspace.
pub const BUILTIN_GROUPS: [(&str, &str); 4] = [
    ("All Guests", "Everyone invited to your wedding"),
    ("Family", "Close family members from both sides"),
    ("Friends", "Close friends and college buddies"),
    ("Bridal Party", "Bridesmaids, groomsmen, and wedding party"),
];

/// The signed-in user's wedding plus its groups. Loaded once after sign-in
/// and threaded through the screens.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub wedding: Wedding,
    pub groups: Vec<GuestGroup>,
}

/// Answers collected by onboarding, used once to create the wedding record.
#[derive(Debug, Clone, Default)]
pub struct WeddingInput {
    pub partner_one: String,
    pub partner_two: String,
    pub wedding_date: Option<String>,
    pub venue: Option<String>,
}

impl WeddingInput {
    pub fn title(&self) -> String {
        format!("{} & {}", self.partner_one, self.partner_two)
    }
}

/// Load the user's workspace. Returns `None` when onboarding has not run
/// yet; never creates records.
pub async fn load(store: &Store, session: &Session) -> Result<Option<Workspace>, StoreError> {
    let weddings: Vec<Wedding> = store
        .list(
            session,
            ListQuery::owned_by(session).order_desc("createdAt").limit(1),
        )
        .await?;
    let Some(wedding) = weddings.into_iter().next() else {
        return Ok(None);
    };

    let groups: Vec<GuestGroup> = store
        .list(
            session,
            ListQuery::owned_by(session)
                .filter("weddingId", wedding.id.as_str())
                .order_asc("createdAt"),
        )
        .await?;

    Ok(Some(Workspace { wedding, groups }))
}

/// The one deliberate provisioning step: create the wedding record from the
/// onboarding answers plus the built-in groups, unless a workspace already
/// exists.
pub async fn initialize(
    store: &Store,
    session: &Session,
    input: WeddingInput,
) -> Result<Workspace, StoreError> {
    if let Some(existing) = load(store, session).await? {
        return Ok(existing);
    }

    let wedding = Wedding {
        id: record_id("wedding"),
        user_id: session.user_id().to_string(),
        title: input.title(),
        partner_one: input.partner_one,
        partner_two: input.partner_two,
        wedding_date: input.wedding_date,
        venue: input.venue,
        description: None,
        created_at: now_iso(),
        updated_at: None,
    };
    store.create(session, &wedding).await?;

    let mut groups = Vec::new();
    for (name, description) in BUILTIN_GROUPS {
        let group = GuestGroup {
            id: record_id("group"),
            user_id: session.user_id().to_string(),
            wedding_id: wedding.id.clone(),
            name: name.to_string(),
            description: Some(description.to_string()),
            builtin: true,
            created_at: now_iso(),
        };
        store.create(session, &group).await?;
        groups.push(group);
    }

    info!("provisioned workspace {} for {}", wedding.id, session.user_id());
    Ok(Workspace { wedding, groups })
}

#[derive(Debug, Clone, Default)]
pub struct DashboardStats {
    pub total_guests: usize,
    pub total_messages: usize,
    pub scheduled_messages: usize,
    /// Replies as a percentage of recipients across sent messages.
    pub reply_rate: u32,
    pub recent_messages: Vec<Message>,
}

pub async fn load_dashboard(
    store: &Store,
    session: &Session,
    workspace: &Workspace,
) -> Result<DashboardStats, StoreError> {
    let guests: Vec<Guest> = store
        .list(
            session,
            ListQuery::owned_by(session).filter("weddingId", workspace.wedding.id.as_str()),
        )
        .await?;
    let messages: Vec<Message> = store
        .list(
            session,
            ListQuery::owned_by(session)
                .filter("weddingId", workspace.wedding.id.as_str())
                .order_desc("createdAt"),
        )
        .await?;

    let total_messages = messages.len();
    let scheduled = messages
        .iter()
        .filter(|m| m.status == MessageStatus::Scheduled)
        .count();
    let rate = reply_rate(&messages);
    let mut recent = messages;
    recent.truncate(5);

    Ok(DashboardStats {
        total_guests: guests.len(),
        total_messages,
        scheduled_messages: scheduled,
        reply_rate: rate,
        recent_messages: recent,
    })
}

/// Replies as a percentage of recipients, over messages that went out.
fn reply_rate(messages: &[Message]) -> u32 {
    let (replies, recipients) = messages
        .iter()
        .filter(|m| m.status == MessageStatus::Sent)
        .fold((0u64, 0u64), |(replies, recipients), m| {
            (
                replies + u64::from(m.reply_count),
                recipients + u64::from(m.recipient_count),
            )
        });
    if recipients == 0 {
        0
    } else {
        (replies * 100 / recipients) as u32
    }
}

/// Persist one guest record per valid row of a reviewed import. The
/// validator never talks to the store; this is the only bridge.
pub async fn commit_import(
    store: &Store,
    session: &Session,
    workspace: &Workspace,
    result: &ImportResult,
) -> Result<usize, StoreError> {
    let mut imported = 0;
    for row in result.valid_rows() {
        let guest = Guest {
            id: record_id("guest"),
            user_id: session.user_id().to_string(),
            wedding_id: workspace.wedding.id.clone(),
            first_name: row.first_name.clone(),
            last_name: (!row.last_name.is_empty()).then(|| row.last_name.clone()),
            phone_number: row.phone_number.clone(),
            email: (!row.email.is_empty()).then(|| row.email.clone()),
            group: (!row.group.is_empty()).then(|| row.group.clone()),
            notes: None,
            created_at: now_iso(),
        };
        store.create(session, &guest).await?;
        imported += 1;
    }
    info!("imported {imported} guests into {}", workspace.wedding.id);
    Ok(imported)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_types::MessageKind;

    fn sent(recipients: u32, replies: u32) -> Message {
        Message {
            id: record_id("msg"),
            user_id: "user_1".into(),
            wedding_id: "wedding_1".into(),
            subject: None,
            content: "hello".into(),
            message_type: MessageKind::Broadcast,
            status: MessageStatus::Sent,
            scheduled_at: None,
            sent_at: Some(now_iso()),
            recipient_count: recipients,
            delivery_count: recipients,
            reply_count: replies,
            created_at: now_iso(),
        }
    }

    #[test]
    fn reply_rate_is_replies_over_recipients() {
        let messages = vec![sent(40, 10), sent(60, 20)];
        assert_eq!(reply_rate(&messages), 30);
    }

    #[test]
    fn reply_rate_ignores_drafts_and_handles_no_recipients() {
        let mut draft = sent(100, 50);
        draft.status = MessageStatus::Draft;
        assert_eq!(reply_rate(&[draft]), 0);
        assert_eq!(reply_rate(&[]), 0);
    }

    #[test]
    fn builtin_groups_match_the_groups_screen() {
        let names: Vec<&str> = BUILTIN_GROUPS.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, ["All Guests", "Family", "Friends", "Bridal Party"]);
    }

    #[test]
    fn wedding_input_title_joins_partners() {
        let input = WeddingInput {
            partner_one: "Jane".into(),
            partner_two: "Alex".into(),
            ..WeddingInput::default()
        };
        assert_eq!(input.title(), "Jane & Alex");
    }
}
