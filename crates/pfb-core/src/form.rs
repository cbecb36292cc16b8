//! Submission form state and its update function.
//!
//! Front ends translate their input events into [`Msg`]s and feed them to
//! [`Form::update`]. A successful `Msg::Submit` hands back the one request the
//! caller must send; its outcome comes back in as `Msg::Settled`.
use crate::{constants::DEFAULT_PORT, Network, SubmitRequest, SubmitResponse};
use tracing::debug;

/// Editable text inputs of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Domain,
    Port,
    NamespaceId,
    Data,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Domain, Field::Port, Field::NamespaceId, Field::Data];

    pub fn label(&self) -> &'static str {
        match self {
            Field::Domain => "Node IP Address",
            Field::Port => "Port",
            Field::NamespaceId => "Namespace ID",
            Field::Data => "Data",
        }
    }

    pub fn help(&self) -> Option<&'static str> {
        match self {
            Field::Domain => Some("Your node's public IP address."),
            Field::Port => Some("Must be open to public."),
            _ => None,
        }
    }
}

/// Outcome of the most recent submit attempt.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    #[default]
    Idle,
    Sending,
    Succeeded { height: u64, tx_hash: String },
    Failed { message: String },
}

impl Submission {
    pub fn is_sending(&self) -> bool {
        matches!(self, Submission::Sending)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Submission::Failed { message } => Some(message),
            _ => None,
        }
    }

    /// Height of the last successful submission, 0 if there is none.
    pub fn height(&self) -> u64 {
        match self {
            Submission::Succeeded { height, .. } => *height,
            _ => 0,
        }
    }

    pub fn tx_hash(&self) -> &str {
        match self {
            Submission::Succeeded { tx_hash, .. } => tx_hash,
            _ => "",
        }
    }

    /// Height and hash worth showing. A response without a height or hash
    /// counts as no result.
    pub fn result(&self) -> Option<(u64, &str)> {
        match self {
            Submission::Succeeded { height, tx_hash } if *height != 0 && !tx_hash.is_empty() => {
                Some((*height, tx_hash))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    Edit(Field, String),
    SetNetwork(Network),
    Submit,
    /// The in-flight request finished; the error side carries the message shown to the user.
    Settled(Result<SubmitResponse, String>),
}

/// A request the caller has to POST on behalf of the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    pub url: String,
    pub body: SubmitRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    domain: String,
    // 0 means empty or unparsable
    port: u16,
    namespace_id: String,
    data: String,
    network: Network,
    submission: Submission,
}

impl Default for Form {
    fn default() -> Self {
        Self {
            domain: String::new(),
            port: DEFAULT_PORT,
            namespace_id: String::new(),
            data: String::new(),
            network: Network::default(),
            submission: Submission::Idle,
        }
    }
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn namespace_id(&self) -> &str {
        &self.namespace_id
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn submission(&self) -> &Submission {
        &self.submission
    }

    /// Stored (trimmed) value of a text field.
    pub fn value(&self, field: Field) -> String {
        match field {
            Field::Domain => self.domain.clone(),
            Field::Port if self.port == 0 => String::new(),
            Field::Port => self.port.to_string(),
            Field::NamespaceId => self.namespace_id.clone(),
            Field::Data => self.data.clone(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.missing_fields().is_empty()
    }

    pub fn missing_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| match f {
                Field::Domain => self.domain.is_empty(),
                Field::Port => self.port == 0,
                Field::NamespaceId => self.namespace_id.is_empty(),
                Field::Data => self.data.is_empty(),
            })
            .collect()
    }

    pub fn is_sending(&self) -> bool {
        self.submission.is_sending()
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        self.is_valid() && !self.is_sending()
    }

    pub fn endpoint(&self) -> String {
        format!(
            "http://{}:{}/{}",
            self.domain,
            self.port,
            self.network.submit_path()
        )
    }

    pub fn request(&self) -> SubmitRequest {
        SubmitRequest::new(self.namespace_id.clone(), self.data.clone())
    }

    pub fn tx_kind(&self) -> &'static str {
        self.network.tx_kind()
    }

    pub fn heading(&self) -> String {
        format!("Submit your {} transaction", self.tx_kind())
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_sending() {
            "Submitting..."
        } else {
            "Submit"
        }
    }

    /// Apply one message. Returns the request to send when a submit is accepted.
    pub fn update(&mut self, msg: Msg) -> Option<Outbound> {
        match msg {
            Msg::Edit(field, raw) => {
                if self.is_sending() {
                    return None;
                }
                let value = raw.trim();
                match field {
                    Field::Domain => self.domain = value.to_string(),
                    Field::Port => self.port = value.parse().unwrap_or(0),
                    Field::NamespaceId => self.namespace_id = value.to_string(),
                    Field::Data => self.data = value.to_string(),
                }
                None
            }
            Msg::SetNetwork(network) => {
                if !self.is_sending() {
                    self.network = network;
                }
                None
            }
            Msg::Submit => {
                if !self.can_submit() {
                    debug!(missing = ?self.missing_fields(), "submit ignored");
                    return None;
                }
                self.submission = Submission::Sending;
                let out = Outbound {
                    url: self.endpoint(),
                    body: self.request(),
                };
                debug!(url = %out.url, "submitting {}", self.tx_kind());
                Some(out)
            }
            Msg::Settled(result) => {
                if !self.is_sending() {
                    return None;
                }
                self.submission = match result {
                    Ok(resp) => Submission::Succeeded {
                        height: resp.height,
                        tx_hash: resp.txhash,
                    },
                    Err(message) => Submission::Failed { message },
                };
                None
            }
        }
    }
}
