// crates/scenario-recorder/src/classifier.rs
// ============================================================================
// Module: Secret Classifier (C2)
// Description: Decides whether a text-entry event targets a credential
//              field and, if so, what kind and parameter name it gets.
// Purpose: Implement `spec.md` §4.2's auth-form gate and kind-priority
//          ladder so recorded `Type` actions reference parameters instead
//          of capturing literal secrets.
// Dependencies: scenario-core
// ============================================================================

//! ## Overview
//! Classification runs in two stages. [`is_auth_form`] gates on keyword
//! evidence from the surrounding form (labels, legend, submit button text)
//! across five languages (English, Spanish, French, German, Portuguese —
//! `DESIGN.md` Open Question decision #4). Only once a form passes that gate
//! does [`classify_field`] assign a [`SecretKind`] to an individual field,
//! checked in fixed priority order: password, email, phone, otp, token.

use scenario_core::ParameterName;

/// The kind of credential a field was classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretKind {
    /// A password or passphrase field.
    Password,
    /// An email address used as a login identifier.
    Email,
    /// A phone number used as a login identifier.
    Phone,
    /// A one-time passcode (SMS/TOTP) field.
    Otp,
    /// An opaque API key or bearer token field.
    Token,
}

impl SecretKind {
    /// The base parameter name stem used before suffixing (`spec.md` §4.2).
    #[must_use]
    pub fn stem(self) -> &'static str {
        match self {
            Self::Password => "password",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Otp => "otp",
            Self::Token => "token",
        }
    }
}

/// Qualifier suffix inferred from nearby label text, distinguishing e.g. a
/// password-change field's "new" and "confirm" entries from its "old" one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldQualifier {
    /// No qualifying context found.
    None,
    /// "confirm", "repeat", "verify".
    Confirm,
    /// "new".
    New,
    /// "old", "current".
    Old,
}

impl FieldQualifier {
    fn suffix(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Confirm => "_confirm",
            Self::New => "_new",
            Self::Old => "_old",
        }
    }
}

/// The textual signals available for one candidate field, gathered by the
/// host from the live DOM (input `type`, attributes, and nearby text).
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldSignals<'a> {
    /// The `type` attribute of an `<input>`, if any.
    pub input_type: Option<&'a str>,
    /// The `id` attribute.
    pub id_attr: Option<&'a str>,
    /// The `name` attribute.
    pub name: Option<&'a str>,
    /// The `placeholder` attribute.
    pub placeholder: Option<&'a str>,
    /// The `aria-label` attribute.
    pub aria_label: Option<&'a str>,
    /// Text of an associated `<label>`, if resolvable.
    pub label_text: Option<&'a str>,
    /// The `autocomplete` attribute.
    pub autocomplete: Option<&'a str>,
    /// The `maxlength` attribute, used to gate OTP classification.
    pub max_length: Option<u32>,
}

/// The outcome of classifying one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Whether this field should be treated as a secret (recorded by
    /// reference, never by literal value).
    pub is_secret: bool,
    /// The inferred kind, when `is_secret` is true.
    pub kind: Option<SecretKind>,
    /// The parameter name a `Type` action referencing this field should use.
    pub parameter_name: Option<ParameterName>,
}

impl Classification {
    fn not_secret() -> Self {
        Self {
            is_secret: false,
            kind: None,
            parameter_name: None,
        }
    }
}

struct KeywordSet {
    password: &'static [&'static str],
    email: &'static [&'static str],
    phone: &'static [&'static str],
    otp: &'static [&'static str],
    token: &'static [&'static str],
    auth_gate: &'static [&'static str],
    confirm: &'static [&'static str],
    new: &'static [&'static str],
    old: &'static [&'static str],
}

const ENGLISH: KeywordSet = KeywordSet {
    password: &["password", "passwd", "pwd", "passphrase"],
    email: &["email", "e-mail", "username"],
    phone: &["phone", "mobile", "cell"],
    otp: &["otp", "one-time", "verification code", "2fa", "authenticator"],
    token: &["token", "api key", "apikey", "secret key", "access key"],
    auth_gate: &["log in", "login", "sign in", "signin", "sign up", "register", "authenticate"],
    confirm: &["confirm", "repeat", "verify"],
    new: &["new"],
    old: &["old", "current"],
};

const SPANISH: KeywordSet = KeywordSet {
    password: &["contraseña", "clave"],
    email: &["correo", "correo electrónico", "usuario"],
    phone: &["teléfono", "móvil", "celular"],
    otp: &["código de verificación", "otp", "2fa"],
    token: &["token", "clave de api", "clave secreta"],
    auth_gate: &["iniciar sesión", "ingresar", "registrarse", "autenticar"],
    confirm: &["confirmar", "repetir", "verificar"],
    new: &["nueva", "nuevo"],
    old: &["antigua", "anterior", "actual"],
};

const FRENCH: KeywordSet = KeywordSet {
    password: &["mot de passe"],
    email: &["courriel", "e-mail", "adresse e-mail", "utilisateur"],
    phone: &["téléphone", "mobile", "portable"],
    otp: &["code de vérification", "otp", "2fa"],
    token: &["jeton", "clé api", "clé secrète"],
    auth_gate: &["connexion", "se connecter", "s'inscrire", "authentifier"],
    confirm: &["confirmer", "répéter", "vérifier"],
    new: &["nouveau", "nouvelle"],
    old: &["ancien", "ancienne", "actuel"],
};

const GERMAN: KeywordSet = KeywordSet {
    password: &["passwort", "kennwort"],
    email: &["e-mail", "email", "benutzername"],
    phone: &["telefon", "handy", "mobil"],
    otp: &["bestätigungscode", "otp", "2fa"],
    token: &["token", "api-schlüssel", "geheimer schlüssel"],
    auth_gate: &["anmelden", "einloggen", "registrieren", "authentifizieren"],
    confirm: &["bestätigen", "wiederholen", "überprüfen"],
    new: &["neu", "neues", "neue"],
    old: &["alt", "altes", "alte", "aktuell"],
};

const PORTUGUESE: KeywordSet = KeywordSet {
    password: &["senha", "palavra-passe"],
    email: &["e-mail", "email", "usuário", "utilizador"],
    phone: &["telefone", "celular", "telemóvel"],
    otp: &["código de verificação", "otp", "2fa"],
    token: &["token", "chave de api", "chave secreta"],
    auth_gate: &["entrar", "iniciar sessão", "login", "cadastrar", "registrar", "autenticar"],
    confirm: &["confirmar", "repetir", "verificar"],
    new: &["novo", "nova"],
    old: &["antigo", "antiga", "atual"],
};

const LANGUAGES: &[&KeywordSet] = &[&ENGLISH, &SPANISH, &FRENCH, &GERMAN, &PORTUGUESE];

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    let lower = haystack.to_lowercase();
    needles.iter().any(|n| lower.contains(n))
}

/// Returns whether `form_text` (labels, legend, and submit-button text
/// joined into one lowercase-insensitive string) carries evidence of an
/// authentication form, in any of the supported languages.
#[must_use]
pub fn is_auth_form(form_text: &str) -> bool {
    LANGUAGES.iter().any(|set| contains_any(form_text, set.auth_gate))
}

fn qualifier(signals: FieldSignals<'_>, set: &KeywordSet) -> FieldQualifier {
    let joined = [
        signals.label_text,
        signals.placeholder,
        signals.aria_label,
        signals.name,
        signals.id_attr,
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ");
    if contains_any(&joined, set.confirm) {
        FieldQualifier::Confirm
    } else if contains_any(&joined, set.new) {
        FieldQualifier::New
    } else if contains_any(&joined, set.old) {
        FieldQualifier::Old
    } else {
        FieldQualifier::None
    }
}

fn matches_kind(signals: FieldSignals<'_>, set: &KeywordSet, keywords: &[&str]) -> bool {
    let text_fields = [
        signals.name,
        signals.id_attr,
        signals.placeholder,
        signals.aria_label,
        signals.label_text,
    ];
    text_fields.into_iter().flatten().any(|t| contains_any(t, keywords))
        || signals.autocomplete.is_some_and(|a| contains_any(a, keywords))
        || {
            let _ = set;
            false
        }
}

/// Classifies one field, assuming its enclosing form already passed
/// [`is_auth_form`].
///
/// Priority order: password > email > phone > otp > token (`spec.md` §4.2).
/// A field matching none of these is not a secret.
#[must_use]
pub fn classify_field(signals: FieldSignals<'_>) -> Classification {
    if signals.input_type == Some("password") {
        return build(SecretKind::Password, signals);
    }
    for set in LANGUAGES {
        if matches_kind(signals, set, set.password) {
            return build(SecretKind::Password, signals);
        }
    }
    if signals.input_type == Some("email") {
        return build(SecretKind::Email, signals);
    }
    for set in LANGUAGES {
        if matches_kind(signals, set, set.email) {
            return build(SecretKind::Email, signals);
        }
    }
    if signals.input_type == Some("tel") {
        return build(SecretKind::Phone, signals);
    }
    let otp_length_eligible = signals.max_length.is_some_and(|n| (4..=8).contains(&n));
    for set in LANGUAGES {
        if matches_kind(signals, set, set.phone) {
            return build(SecretKind::Phone, signals);
        }
        if otp_length_eligible && matches_kind(signals, set, set.otp) {
            return build(SecretKind::Otp, signals);
        }
        if matches_kind(signals, set, set.token) {
            return build(SecretKind::Token, signals);
        }
    }
    Classification::not_secret()
}

fn build(kind: SecretKind, signals: FieldSignals<'_>) -> Classification {
    let mut qualified = FieldQualifier::None;
    for set in LANGUAGES {
        let q = qualifier(signals, set);
        if q != FieldQualifier::None {
            qualified = q;
            break;
        }
    }
    let name = format!("{}{}", kind.stem(), qualified.suffix());
    Classification {
        is_secret: true,
        kind: Some(kind),
        parameter_name: ParameterName::new(name).ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_input_type_wins_regardless_of_label_language() {
        let signals = FieldSignals {
            input_type: Some("password"),
            ..Default::default()
        };
        let out = classify_field(signals);
        assert!(out.is_secret);
        assert_eq!(out.kind, Some(SecretKind::Password));
        assert_eq!(out.parameter_name.unwrap().as_str(), "password");
    }

    #[test]
    fn confirm_password_gets_suffixed_parameter_name() {
        let signals = FieldSignals {
            input_type: Some("password"),
            label_text: Some("Confirm your password"),
            ..Default::default()
        };
        let out = classify_field(signals);
        assert_eq!(out.parameter_name.unwrap().as_str(), "password_confirm");
    }

    #[test]
    fn spanish_password_label_is_recognised() {
        let signals = FieldSignals {
            label_text: Some("Contraseña nueva"),
            ..Default::default()
        };
        let out = classify_field(signals);
        assert!(out.is_secret);
        assert_eq!(out.kind, Some(SecretKind::Password));
        assert_eq!(out.parameter_name.unwrap().as_str(), "password_new");
    }

    #[test]
    fn non_matching_field_is_not_a_secret() {
        let signals = FieldSignals {
            input_type: Some("text"),
            name: Some("comments"),
            ..Default::default()
        };
        let out = classify_field(signals);
        assert!(!out.is_secret);
        assert!(out.kind.is_none());
    }

    #[test]
    fn priority_order_prefers_password_over_email_when_both_match() {
        let signals = FieldSignals {
            name: Some("password_email_combo"),
            ..Default::default()
        };
        let out = classify_field(signals);
        assert_eq!(out.kind, Some(SecretKind::Password));
    }

    #[test]
    fn otp_keyword_without_eligible_max_length_is_not_classified_as_otp() {
        let signals = FieldSignals {
            name: Some("verification code"),
            max_length: Some(20),
            ..Default::default()
        };
        let out = classify_field(signals);
        assert_ne!(out.kind, Some(SecretKind::Otp));
    }

    #[test]
    fn otp_keyword_with_eligible_max_length_is_classified_as_otp() {
        let signals = FieldSignals {
            name: Some("verification code"),
            max_length: Some(6),
            ..Default::default()
        };
        let out = classify_field(signals);
        assert_eq!(out.kind, Some(SecretKind::Otp));
    }

    #[test]
    fn id_attribute_contributes_to_qualifier_suffix() {
        let signals = FieldSignals {
            input_type: Some("password"),
            id_attr: Some("new_password"),
            ..Default::default()
        };
        let out = classify_field(signals);
        assert_eq!(out.parameter_name.unwrap().as_str(), "password_new");
    }

    #[test]
    fn auth_gate_recognises_french_and_german_forms() {
        assert!(is_auth_form("Se connecter à votre compte"));
        assert!(is_auth_form("Bitte melden Sie sich an"));
        assert!(!is_auth_form("Subscribe to our newsletter"));
    }
}
