pub(crate) type Username = String;
pub(crate) type SubjectId = String;

/// A mock account. Roles and buttons behave as sets but keep seed order so
/// responses are stable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Identity {
    pub(crate) subject_id: SubjectId,
    pub(crate) username: Username,
    pub(crate) secret: String,
    pub(crate) roles: Vec<String>,
    pub(crate) buttons: Vec<String>,
}

impl Identity {
    pub(crate) fn new(
        subject_id: &str,
        username: &str,
        secret: &str,
        roles: &[&str],
        buttons: &[&str],
    ) -> Self {
        Self {
            subject_id: subject_id.to_owned(),
            username: username.to_owned(),
            secret: secret.to_owned(),
            roles: dedup(roles),
            buttons: dedup(buttons),
        }
    }
}

fn dedup(values: &[&str]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());

    for value in values {
        if !out.iter().any(|v| v == value) {
            out.push((*value).to_owned());
        }
    }

    out
}
