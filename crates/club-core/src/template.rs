//! # Email Templates
//!
//! Composes the automatic emails (payment confirmation, equipment handed
//! out) from the administrator-edited templates.
//!
//! ## Placeholders
//! ```text
//! ┌──────────────────────┬──────────────────────────────────────────────────┐
//! │ {{recipientName}}    │ legal representative if any, else the licensee  │
//! │ {{licenseeName}}     │ "First Last" of the licensee                     │
//! │ {{clubName}} ...     │ club info (address newlines become <br />)       │
//! │ {{finalPrice}}       │ payment confirmation only, "120.00"              │
//! │ {{packName}}         │ payment confirmation only                        │
//! │ {{equipmentList}}    │ equipment emails only, an HTML <ul>              │
//! └──────────────────────┴──────────────────────────────────────────────────┘
//! ```
//!
//! Unknown placeholders are left in the text as typed. Composing only
//! builds the message; delivery happens elsewhere.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{CoreError, CoreResult};
use crate::pricing::calculate_final_price;
use crate::types::{
    AssignedEquipment, ClubInfo, EmailKind, EmailTemplates, Licensee, Pack, Reduction,
};

/// Marker appended to items handed out while out of stock.
const OUT_OF_STOCK_MARKER: &str = r#" <strong style="color: #dc2626;">- En rupture</strong>"#;

/// Replaces every `{{key}}` of the context in `template`.
pub fn render(template: &str, context: &BTreeMap<String, String>) -> String {
    context
        .iter()
        .fold(template.to_string(), |text, (key, value)| {
            text.replace(&format!("{{{{{key}}}}}"), value)
        })
}

/// HTML list of assigned items for the equipment emails.
pub fn equipment_list_html(items: &[AssignedEquipment]) -> String {
    let mut html = String::from("<ul>");
    for item in items {
        html.push_str("<li>");
        html.push_str(&item.name);
        html.push_str(" (");
        html.push_str(&item.size);
        html.push(')');
        if item.out_of_stock {
            html.push_str(OUT_OF_STOCK_MARKER);
        }
        html.push_str("</li>");
    }
    html.push_str("</ul>");
    html
}

// =============================================================================
// Context
// =============================================================================

/// Recipient and placeholder values for one email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailContext {
    pub recipient_name: String,
    pub recipient_email: String,
    pub values: BTreeMap<String, String>,
}

impl EmailContext {
    pub fn for_licensee(licensee: &Licensee, club: &ClubInfo) -> Self {
        let (recipient_name, recipient_email) = match &licensee.legal_representative {
            Some(rep) => (format!("{} {}", rep.first_name, rep.last_name), rep.email.clone()),
            None => (licensee.full_name(), licensee.email.clone()),
        };

        let opt = |v: &Option<String>| v.clone().unwrap_or_default();
        let mut values = BTreeMap::new();
        values.insert("recipientName".to_string(), recipient_name.clone());
        values.insert("licenseeName".to_string(), licensee.full_name());
        values.insert("clubName".to_string(), club.name.clone());
        values.insert(
            "clubAddress".to_string(),
            club.address.replace('\n', "<br />"),
        );
        values.insert("clubEmail".to_string(), opt(&club.email));
        values.insert("clubPhone".to_string(), opt(&club.phone));
        values.insert("clubResponsibleName".to_string(), opt(&club.responsible_name));
        values.insert("clubFacebookUrl".to_string(), opt(&club.facebook_url));
        values.insert("clubInstagramUrl".to_string(), opt(&club.instagram_url));

        EmailContext {
            recipient_name,
            recipient_email,
            values,
        }
    }

    /// Adds or overrides a placeholder value.
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.values.insert(key.to_string(), value.into());
        self
    }
}

// =============================================================================
// Composition
// =============================================================================

/// A rendered email, ready to be queued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposedEmail {
    pub template: &'static str,
    pub licensee_id: String,
    pub recipient_name: String,
    pub recipient_email: String,
    pub subject: String,
    pub body: String,
}

/// Renders the template of `kind` for a licensee.
///
/// `extra` values override the standard placeholders.
pub fn compose(
    kind: EmailKind,
    templates: &EmailTemplates,
    licensee: &Licensee,
    club: &ClubInfo,
    extra: &[(&str, String)],
) -> CoreResult<ComposedEmail> {
    let template = templates.get(kind);
    if !template.is_complete() {
        return Err(CoreError::TemplateMissing(kind.key().to_string()));
    }

    let context = extra
        .iter()
        .fold(EmailContext::for_licensee(licensee, club), |ctx, (k, v)| {
            ctx.with(k, v.clone())
        });

    Ok(ComposedEmail {
        template: kind.key(),
        licensee_id: licensee.id.clone(),
        subject: render(&template.subject, &context.values),
        body: render(&template.body, &context.values),
        recipient_name: context.recipient_name,
        recipient_email: context.recipient_email,
    })
}

/// The email sent when a registration becomes fully paid.
pub fn payment_confirmation(
    templates: &EmailTemplates,
    licensee: &Licensee,
    pack: &Pack,
    catalog: &[Reduction],
    club: &ClubInfo,
) -> CoreResult<ComposedEmail> {
    let final_price = calculate_final_price(pack.price, &licensee.reductions, catalog);
    compose(
        EmailKind::PaymentConfirmation,
        templates,
        licensee,
        club,
        &[
            ("packName", pack.name.clone()),
            ("finalPrice", final_price.to_decimal_string()),
        ],
    )
}

/// The email sent after equipment was assigned, chosen from the
/// licensee's equipment status.
pub fn equipment_notification(
    templates: &EmailTemplates,
    licensee: &Licensee,
    club: &ClubInfo,
) -> CoreResult<ComposedEmail> {
    compose(
        EmailKind::for_equipment(licensee.equipment_status),
        templates,
        licensee,
        club,
        &[(
            "equipmentList",
            equipment_list_html(&licensee.assigned_equipment),
        )],
    )
}

// =============================================================================
// Unit Tests
// =============================================================================
