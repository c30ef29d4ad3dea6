//! System messages emitted by the onboarding flow.

use super::field::{FieldKey, FileFilter};

pub const FILL_THE_FIELD: &str = "Please fill the field.";
pub const INVALID_INPUT: &str = "Invalid input, please try again.";
pub const INVALID_CHOICE: &str = "Please select a valid qualification from the list.";
pub const USE_UPLOAD: &str = "Please use the upload button to attach a file.";
pub const COMPLETED: &str = "Thank you! You can now review and save your information.";
pub const UPDATED: &str = "Updated! You can review and save your information.";
pub const REVIEW_CHOICE: &str = "Please choose Edit Information or Save Information.";
pub const SAVED: &str = "Your details are saved successfully.";
pub const SAVE_FAILED: &str = "Sorry, your details could not be saved. Please try again.";

/// Review-screen button labels, also accepted as typed commands.
pub const EDIT_INFORMATION: &str = "Edit Information";
pub const SAVE_INFORMATION: &str = "Save Information";

/// One selectable line of the edit menu.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct MenuOption {
    pub number: u8,
    pub label: String,
    /// `None` for the "start over" entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<FieldKey>,
}

/// Edit menu entries: "1" starts over, then one entry per field.
pub fn edit_menu_options() -> Vec<MenuOption> {
    let mut options = vec![MenuOption {
        number: 1,
        label: "Edit full details".to_string(),
        key: None,
    }];
    options.extend(FieldKey::ALL.iter().zip(2u8..).map(|(key, number)| MenuOption {
        number,
        label: format!("Edit {}", key.label()),
        key: Some(*key),
    }));
    options
}

/// The "which field?" prompt with the numbered menu.
pub fn edit_menu_prompt() -> String {
    let mut text = String::from("Which field would you like to edit? Please choose:");
    for option in edit_menu_options() {
        text.push_str(&format!("\n{}. {}", option.number, option.label));
    }
    text
}

/// Parse an edit-menu answer: a menu number, a field key, or a field label.
///
/// Number 1 ("start over") is not a field and yields `None`, as does any
/// unrecognized answer.
pub fn parse_edit_choice(input: &str) -> Option<FieldKey> {
    let input = input.trim();
    if let Ok(number) = input.parse::<u8>() {
        return edit_menu_options()
            .into_iter()
            .find(|o| o.number == number)
            .and_then(|o| o.key);
    }
    let stripped = input
        .strip_prefix("Edit ")
        .or_else(|| input.strip_prefix("edit "))
        .unwrap_or(input);
    stripped.parse().ok()
}

pub fn invalid_edit_option() -> String {
    let last = edit_menu_options().len();
    format!("Invalid option. Please choose a number from 1 to {last}.")
}

pub fn wrong_file_type(filter: FileFilter) -> String {
    match filter {
        FileFilter::Image => "Please upload an image (JPEG or PNG).".to_string(),
        FileFilter::Pdf => "Please upload a PDF document.".to_string(),
    }
}

/// Button label for an upload step.
pub fn upload_label(filter: FileFilter) -> &'static str {
    match filter {
        FileFilter::Image => "Upload Profile Photo",
        FileFilter::Pdf => "Upload PDF Document",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_numbers_follow_field_order() {
        let options = edit_menu_options();
        assert_eq!(options.len(), 8);
        assert_eq!(options[0].number, 1);
        assert!(options[0].key.is_none());
        assert_eq!(options[1].key, Some(FieldKey::Name));
        assert_eq!(options[7].key, Some(FieldKey::Document));
        assert_eq!(options[7].number, 8);
    }

    #[test]
    fn menu_prompt_lists_every_option() {
        let prompt = edit_menu_prompt();
        assert!(prompt.starts_with("Which field would you like to edit?"));
        assert!(prompt.contains("\n1. Edit full details"));
        assert!(prompt.contains("\n2. Edit Name"));
        assert!(prompt.contains("\n4. Edit Phone Number"));
        assert!(prompt.contains("\n8. Edit Document"));
    }

    #[test]
    fn parse_edit_choice_accepts_numbers_keys_and_labels() {
        assert_eq!(parse_edit_choice("2"), Some(FieldKey::Name));
        assert_eq!(parse_edit_choice(" 6 "), Some(FieldKey::Skills));
        assert_eq!(parse_edit_choice("phone"), Some(FieldKey::Phone));
        assert_eq!(parse_edit_choice("Edit Profile Photo"), Some(FieldKey::ProfilePhoto));
        assert_eq!(parse_edit_choice("1"), None);
        assert_eq!(parse_edit_choice("9"), None);
        assert_eq!(parse_edit_choice("hobbies"), None);
    }

    #[test]
    fn invalid_option_mentions_range() {
        assert_eq!(
            invalid_edit_option(),
            "Invalid option. Please choose a number from 1 to 8."
        );
    }
}
