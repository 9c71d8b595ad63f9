use shared_types::Contact;

use super::CampaignBrief;

pub fn build_system_prompt(brief: &CampaignBrief<'_>) -> String {
    format!(
        r#"You are writing a follow-up email on behalf of an event organizer to business contacts they met at "{}".

## Audience

Group: {}

{}

## Requirements

1. Write one email that works for every contact in the group; use merge-style placeholders {{{{first_name}}}} and {{{{company}}}} where personalization belongs.
2. Reference the event naturally; the reader met the sender there.
3. Keep it short: a subject line under 60 characters and a body under 150 words.
4. End with a single clear call to action.
5. Tone: {}.
{}
Return a JSON object with exactly two keys: "subject" and "body"."#,
        brief.event_name,
        brief.group_name,
        format_contacts(brief.contacts),
        brief.tone.unwrap_or("professional and friendly"),
        brief
            .instructions
            .map(|i| format!("6. Additional instructions from the organizer: {}\n", i))
            .unwrap_or_default(),
    )
}

fn format_contacts(contacts: &[Contact]) -> String {
    if contacts.is_empty() {
        return "No member details available.".to_string();
    }

    let mut output = format!("Members: {}\n\n", contacts.len());

    for contact in contacts.iter().take(10) {
        let name = match (&contact.first_name, &contact.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => "(unnamed)".to_string(),
        };

        let mut line = format!("- {}", name);
        if let Some(title) = &contact.title {
            line.push_str(&format!(", {}", title));
        }
        if let Some(company) = &contact.company {
            line.push_str(&format!(" at {}", company));
        }
        if let Some(industry) = &contact.industry {
            line.push_str(&format!(" ({})", industry));
        }
        output.push_str(&line);
        output.push('\n');
    }

    if contacts.len() > 10 {
        output.push_str(&format!("... and {} more contacts\n", contacts.len() - 10));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_contacts_empty() {
        assert_eq!(format_contacts(&[]), "No member details available.");
    }
}
