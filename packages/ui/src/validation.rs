//! # Declarative form validation
//!
//! Each form is described by a [`Schema`]: an ordered table of fields, each with
//! an ordered list of [`Rule`]s. [`Schema::validate`] is a pure function from
//! [`FormValues`] to [`FieldErrors`]; the first failing rule of a field becomes
//! that field's message and later rules are not consulted.
//!
//! | Schema | Fields |
//! |--------|--------|
//! | [`user_schema`]`(Create)` / [`register_schema`] | first name, last name, username (required); password (required, min 6) |
//! | [`user_schema`]`(Edit)` | as above, but the password is optional; a non-empty one still needs 6 characters |
//! | [`login_schema`] | username, password (required) |
//!
//! An empty value counts as "absent": [`Rule::MinLength`] only judges values
//! that were actually entered.

use std::collections::BTreeMap;

pub const PASSWORD_MIN_LENGTH: usize = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    FirstName,
    LastName,
    Username,
    Password,
}

impl Field {
    /// Wire and DOM name of the field.
    pub fn name(self) -> &'static str {
        match self {
            Field::FirstName => "firstName",
            Field::LastName => "lastName",
            Field::Username => "username",
            Field::Password => "password",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::FirstName => "First Name",
            Field::LastName => "Last Name",
            Field::Username => "Username",
            Field::Password => "Password",
        }
    }

    pub fn input_type(self) -> &'static str {
        match self {
            Field::Password => "password",
            _ => "text",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rule {
    Required { message: String },
    /// Length is measured in UTF-16 code units, like a browser's `value.length`.
    MinLength { min: usize, message: String },
}

impl Rule {
    pub fn required(message: impl Into<String>) -> Self {
        Rule::Required {
            message: message.into(),
        }
    }

    pub fn min_length(min: usize, message: impl Into<String>) -> Self {
        Rule::MinLength {
            min,
            message: message.into(),
        }
    }

    /// The rule's message if `value` breaks it.
    pub fn check(&self, value: &str) -> Option<&str> {
        match self {
            Rule::Required { message } if value.is_empty() => Some(message.as_str()),
            Rule::MinLength { min, message }
                if !value.is_empty() && value.encode_utf16().count() < *min =>
            {
                Some(message.as_str())
            }
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldRules {
    pub field: Field,
    pub rules: Vec<Rule>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<FieldRules>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: append a field and its rules, in display order.
    pub fn field(mut self, field: Field, rules: Vec<Rule>) -> Self {
        self.fields.push(FieldRules { field, rules });
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.fields.iter().map(|f| f.field)
    }

    pub fn rules_for(&self, field: Field) -> &[Rule] {
        self.fields
            .iter()
            .find(|f| f.field == field)
            .map(|f| f.rules.as_slice())
            .unwrap_or_default()
    }

    pub fn is_required(&self, field: Field) -> bool {
        self.rules_for(field)
            .iter()
            .any(|r| matches!(r, Rule::Required { .. }))
    }

    pub fn validate(&self, values: &FormValues) -> FieldErrors {
        let mut errors = FieldErrors::default();
        for entry in &self.fields {
            let value = values.get(entry.field);
            if let Some(message) = entry.rules.iter().find_map(|r| r.check(value)) {
                errors.insert(entry.field, message.to_string());
            }
        }
        errors
    }
}

/// Whether a form creates a new account or edits an existing one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { id: String },
}

impl FormMode {
    pub fn is_edit(&self) -> bool {
        matches!(self, FormMode::Edit { .. })
    }
}

fn password_rules(required: bool) -> Vec<Rule> {
    let mut rules = Vec::new();
    if required {
        rules.push(Rule::required("Password is required"));
    }
    rules.push(Rule::min_length(
        PASSWORD_MIN_LENGTH,
        format!("Password must be at least {PASSWORD_MIN_LENGTH} characters"),
    ));
    rules
}

/// Add / edit user form. Only the edit variant lets the password stay blank.
pub fn user_schema(mode: &FormMode) -> Schema {
    Schema::new()
        .field(Field::FirstName, vec![Rule::required("First Name is required")])
        .field(Field::LastName, vec![Rule::required("Last Name is required")])
        .field(Field::Username, vec![Rule::required("Username is required")])
        .field(Field::Password, password_rules(!mode.is_edit()))
}

pub fn register_schema() -> Schema {
    user_schema(&FormMode::Create)
}

pub fn login_schema() -> Schema {
    Schema::new()
        .field(Field::Username, vec![Rule::required("Username is required")])
        .field(Field::Password, vec![Rule::required("Password is required")])
}

/// Current text of every field; missing fields read as empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormValues(BTreeMap<Field, String>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn get(&self, field: Field) -> &str {
        self.0.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.0.insert(field, value.into());
    }

    pub fn from_user(user: &api::User) -> Self {
        Self::new()
            .with(Field::FirstName, &user.first_name)
            .with(Field::LastName, &user.last_name)
            .with(Field::Username, &user.username)
    }

    pub fn to_new_user(&self) -> api::NewUser {
        api::NewUser {
            first_name: self.get(Field::FirstName).to_string(),
            last_name: self.get(Field::LastName).to_string(),
            username: self.get(Field::Username).to_string(),
            password: self.get(Field::Password).to_string(),
        }
    }

    pub fn to_update(&self) -> api::UserUpdate {
        api::UserUpdate::new(
            self.get(Field::FirstName),
            self.get(Field::LastName),
            self.get(Field::Username),
            self.get(Field::Password),
        )
    }
}

/// Per-field validation messages. Never routed to the alert channel.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn insert(&mut self, field: Field, message: String) {
        self.0.insert(field, message);
    }

    pub fn remove(&mut self, field: Field) {
        self.0.remove(&field);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}
