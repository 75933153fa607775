//! Schema types for Help Scout resources.
//!
//! # Design
//! Every field is optional: the API omits fields freely and a `fields`
//! selection can trim a record down to a handful of keys. Field names match
//! the wire keys after lower-casing (`publicUrl` becomes `publicurl`), which
//! is what `deserialize::normalize_keys` produces. Keys without a matching
//! field land in `extra` so newer server fields survive a round trip.
//!
//! Person-like references (`createdBy`, `owner`, `customer`, ...) share a
//! single `PersonRef` record; its `kind` tells customers and users apart.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::deserialize::parse;
use crate::error::{DocsError, Result};

/// A record type the client can deserialize from a response envelope.
pub trait Schema: serde::de::DeserializeOwned {
    /// Type name; its lower-cased form is the single-item envelope key.
    const NAME: &'static str;

    fn envelope_key() -> String {
        Self::NAME.to_lowercase()
    }
}

/// Resource identifier. The docs API uses hex strings, the mailbox API
/// integers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Number(i64),
    Text(String),
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Number(n) => write!(f, "{n}"),
            Id::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Id {
    fn from(n: i64) -> Self {
        Id::Number(n)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id::Text(s.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefKind {
    Customer,
    User,
    Team,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreadKind {
    LineItem,
    Note,
    Message,
    Customer,
    ForwardParent,
    ForwardChild,
    Phone,
    Chat,
    #[serde(other)]
    Other,
}

fn non_empty<T>(list: &Option<Vec<T>>) -> bool {
    list.as_ref().is_some_and(|l| !l.is_empty())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Article {
    pub id: Option<Id>,
    pub name: Option<String>,
    #[serde(rename = "publicurl")]
    pub public_url: Option<String>,
    #[serde(rename = "updatedat")]
    pub updated_at: Option<String>,
    #[serde(rename = "createdby")]
    pub created_by: Option<Id>,
    #[serde(rename = "updatedby")]
    pub updated_by: Option<Id>,
    pub text: Option<String>,
    pub keywords: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Collection {
    pub id: Option<Id>,
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Category {
    pub id: Option<Id>,
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Shared shape of every person reference: thread authors, owners,
/// conversation customers and the like.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonRef {
    pub id: Option<Id>,
    #[serde(rename = "firstname")]
    pub first_name: Option<String>,
    #[serde(rename = "lastname")]
    pub last_name: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<RefKind>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PersonRef {
    pub fn is_customer(&self) -> bool {
        self.kind == Some(RefKind::Customer)
    }

    pub fn is_user(&self) -> bool {
        self.kind == Some(RefKind::User)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailboxRef {
    pub id: Option<Id>,
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Source {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub via: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Source {
    pub fn is_via_customer(&self) -> bool {
        self.via.as_deref() == Some("customer")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thread {
    pub id: Option<Id>,
    #[serde(rename = "type")]
    pub kind: Option<ThreadKind>,
    pub state: Option<String>,
    pub body: Option<String>,
    #[serde(rename = "createdby")]
    pub created_by: Option<PersonRef>,
    #[serde(rename = "tolist")]
    pub to_list: Option<Vec<String>>,
    #[serde(rename = "cclist")]
    pub cc_list: Option<Vec<String>>,
    #[serde(rename = "bcclist")]
    pub bcc_list: Option<Vec<String>>,
    pub attachments: Option<Vec<Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Thread {
    pub fn is_published(&self) -> bool {
        self.state.as_deref() == Some("published")
    }

    pub fn is_draft(&self) -> bool {
        self.state.as_deref() == Some("draft")
    }

    pub fn is_held_for_review(&self) -> bool {
        self.state.as_deref() == Some("underreview")
    }

    pub fn has_attachments(&self) -> bool {
        non_empty(&self.attachments)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conversation {
    pub id: Option<Id>,
    #[serde(rename = "folderid")]
    pub folder_id: Option<Id>,
    #[serde(rename = "isdraft")]
    pub is_draft: Option<bool>,
    pub number: Option<i64>,
    pub source: Option<Source>,
    pub mailbox: Option<MailboxRef>,
    pub customer: Option<PersonRef>,
    #[serde(rename = "threadcount")]
    pub thread_count: Option<i64>,
    pub status: Option<String>,
    pub subject: Option<String>,
    pub preview: Option<String>,
    #[serde(rename = "createdat")]
    pub created_at: Option<String>,
    #[serde(rename = "usermodifiedat")]
    pub user_modified_at: Option<String>,
    #[serde(rename = "closedat")]
    pub closed_at: Option<String>,
    #[serde(rename = "closedby")]
    pub closed_by: Option<PersonRef>,
    #[serde(rename = "createdby")]
    pub created_by: Option<PersonRef>,
    #[serde(rename = "cclist")]
    pub cc_list: Option<Vec<String>>,
    #[serde(rename = "bcclist")]
    pub bcc_list: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub owner: Option<PersonRef>,
    pub threads: Option<Vec<Thread>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Conversation {
    pub fn is_created_by_customer(&self) -> bool {
        self.created_by.as_ref().is_some_and(PersonRef::is_customer)
    }

    pub fn has_cc_list(&self) -> bool {
        non_empty(&self.cc_list)
    }

    pub fn has_bcc_list(&self) -> bool {
        non_empty(&self.bcc_list)
    }

    pub fn has_tags(&self) -> bool {
        non_empty(&self.tags)
    }

    pub fn has_threads(&self) -> bool {
        non_empty(&self.threads)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Person {
    pub id: Option<Id>,
    #[serde(rename = "firstname")]
    pub first_name: Option<String>,
    #[serde(rename = "lastname")]
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<RefKind>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub id: Option<Id>,
    pub lines: Option<Vec<String>>,
    pub city: Option<String>,
    pub state: Option<String>,
    #[serde(rename = "postalcode")]
    pub postal_code: Option<String>,
    pub country: Option<String>,
    #[serde(rename = "createdat")]
    pub created_at: Option<String>,
    #[serde(rename = "modifiedat")]
    pub modified_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One contact channel of a customer. Emails, phones, chats, social profiles
/// and websites all share this shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerEntry {
    pub id: Option<Id>,
    pub value: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub location: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub type EmailEntry = CustomerEntry;
pub type ChatEntry = CustomerEntry;
pub type PhoneEntry = CustomerEntry;
pub type SocialProfileEntry = CustomerEntry;
pub type WebsiteEntry = CustomerEntry;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Customer {
    pub id: Option<Id>,
    #[serde(rename = "firstname")]
    pub first_name: Option<String>,
    #[serde(rename = "lastname")]
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub age: Option<String>,
    #[serde(rename = "jobtitle")]
    pub job_title: Option<String>,
    pub location: Option<String>,
    pub organization: Option<String>,
    #[serde(rename = "photourl")]
    pub photo_url: Option<String>,
    #[serde(rename = "phototype")]
    pub photo_type: Option<String>,
    #[serde(rename = "createdat")]
    pub created_at: Option<String>,
    #[serde(rename = "modifiedat")]
    pub modified_at: Option<String>,
    pub background: Option<String>,
    pub address: Option<Address>,
    #[serde(rename = "socialprofiles")]
    pub social_profiles: Option<Vec<SocialProfileEntry>>,
    pub emails: Option<Vec<EmailEntry>>,
    pub phones: Option<Vec<PhoneEntry>>,
    pub chats: Option<Vec<ChatEntry>>,
    pub websites: Option<Vec<WebsiteEntry>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Customer {
    pub fn has_background(&self) -> bool {
        self.background.is_some()
    }

    pub fn has_address(&self) -> bool {
        self.address.is_some()
    }

    pub fn has_social_profiles(&self) -> bool {
        non_empty(&self.social_profiles)
    }

    pub fn has_emails(&self) -> bool {
        self.emails.is_some()
    }

    pub fn has_phones(&self) -> bool {
        non_empty(&self.phones)
    }

    pub fn has_chats(&self) -> bool {
        non_empty(&self.chats)
    }

    pub fn has_websites(&self) -> bool {
        non_empty(&self.websites)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Folder {
    pub id: Option<Id>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(rename = "userid")]
    pub user_id: Option<Id>,
    #[serde(rename = "totalcount")]
    pub total_count: Option<i64>,
    #[serde(rename = "activecount")]
    pub active_count: Option<i64>,
    #[serde(rename = "modifiedat")]
    pub modified_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Mailbox {
    pub id: Option<Id>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "createdat")]
    pub created_at: Option<String>,
    #[serde(rename = "modifiedat")]
    pub modified_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: Option<Id>,
    #[serde(rename = "firstname")]
    pub first_name: Option<String>,
    #[serde(rename = "lastname")]
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub timezone: Option<String>,
    #[serde(rename = "photourl")]
    pub photo_url: Option<String>,
    #[serde(rename = "createdat")]
    pub created_at: Option<String>,
    #[serde(rename = "modifiedat")]
    pub modified_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Map a per-role type name onto the record type that models it.
fn canonical_name(name: &str) -> &str {
    match name {
        "UserRef" | "CustomerRef" | "Note" | "Message" | "ForwardChild" | "ForwardParent" => {
            "PersonRef"
        }
        "EmailEntry" | "ChatEntry" | "PhoneEntry" | "SocialProfileEntry" | "WebsiteEntry" => {
            "CustomerEntry"
        }
        other => other,
    }
}

macro_rules! schema_types {
    ($($ty:ident),* $(,)?) => {
        $(
            impl Schema for $ty {
                const NAME: &'static str = stringify!($ty);
            }
        )*

        /// Any schema type, for callers that only know the type name at
        /// runtime.
        #[derive(Debug, Clone, PartialEq)]
        pub enum Record {
            $($ty($ty),)*
        }

        impl Record {
            /// Every registered schema type name.
            pub const NAMES: &'static [&'static str] = &[$(stringify!($ty)),*];

            pub fn schema_name(&self) -> &'static str {
                match self {
                    $(Record::$ty(_) => stringify!($ty),)*
                }
            }

            /// Deserialize `value` as the schema type called `name`.
            ///
            /// Per-role names (`UserRef`, `Note`, `EmailEntry`, ...) resolve to
            /// the shared record they are modelled by. Unknown names fail with
            /// `DocsError::Configuration`, even for a `null` value; a known
            /// name with a `null` value yields `None`.
            pub fn from_named(name: &str, value: Value) -> Result<Option<Record>> {
                match canonical_name(name) {
                    $(stringify!($ty) => Ok(parse::<$ty>(value)?.map(Record::$ty)),)*
                    other => Err(DocsError::Configuration(other.to_string())),
                }
            }
        }
    };
}

schema_types!(
    Article,
    Collection,
    Category,
    Conversation,
    Person,
    Customer,
    Folder,
    Mailbox,
    Source,
    User,
    Address,
    CustomerEntry,
    MailboxRef,
    PersonRef,
    Thread,
);
