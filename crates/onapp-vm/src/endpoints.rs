//! Declarative table of virtual machine endpoints.
//!
//! Each [`VmOperation`] maps to one [`Endpoint`]: the verb, the path template,
//! where the caller's options go and how the response is unwrapped. The
//! client has a single executor that interprets these values; nothing about an
//! endpoint is decided anywhere else.

use crate::models::{Identifier, Options};
use crate::Result;
use onapp_core::{Error, Payload};
use reqwest::Method;
use serde_json::Value;

/// Envelope key of a virtual machine.
pub const VIRTUAL_MACHINE: &str = "virtual_machine";

/// Envelope key of a console session.
pub const REMOTE_ACCESS_SESSION: &str = "remote_access_session";

/// HTTP verb of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
}

impl Verb {
    /// The matching `reqwest` method.
    #[must_use]
    pub fn method(self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Post => Method::POST,
            Self::Put => Method::PUT,
            Self::Delete => Method::DELETE,
        }
    }
}

/// Where an endpoint sends the caller's options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Nothing is sent; options are ignored.
    Empty,
    /// JSON body `{key: options}`, sent even when `options` is empty.
    WrappedBody(&'static str),
    /// Query string built from the options as-is; omitted when empty.
    Query,
    /// Query string `key[name]=value` built from `{key: options}`.
    WrappedQuery(&'static str),
}

impl Placement {
    /// Turn `options` into the payload handed to the base client.
    #[must_use]
    pub fn payload(self, options: Options) -> Payload {
        match self {
            Self::Empty => Payload::None,
            Self::WrappedBody(key) => Payload::Body(options.wrapped(key)),
            Self::Query if options.is_empty() => Payload::None,
            Self::Query => Payload::Query(options.into_value()),
            Self::WrappedQuery(key) => Payload::Query(options.wrapped(key)),
        }
    }
}

/// How an endpoint's response is unwrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    /// Array of envelopes; each element becomes `element[key]`.
    EnvelopeList(&'static str),
    /// Value of the first key of the response object, whatever its name.
    FirstValue,
    /// `response[key]`, `null` when absent.
    Key(&'static str),
    /// The parsed body unchanged.
    Raw,
}

impl Extraction {
    /// Apply the rule to a parsed response.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedResponse`] when the body's shape cannot
    /// carry the rule (a list endpoint answered with an object, an empty
    /// object where a first value is required).
    pub fn extract(self, response: Value) -> Result<Value> {
        match (self, response) {
            (Self::Raw, response) => Ok(response),
            (Self::EnvelopeList(key), response) => {
                unwrap_envelopes(key, response).map(Value::Array)
            }
            (Self::FirstValue, Value::Object(map)) => map
                .into_iter()
                .next()
                .map(|(_, value)| value)
                .ok_or_else(|| {
                    Error::UnexpectedResponse("expected an envelope, got an empty object".into())
                }),
            (Self::FirstValue, other) => Err(Error::UnexpectedResponse(format!(
                "expected an envelope, got {}",
                kind(&other)
            ))),
            (Self::Key(_), Value::Null) => Ok(Value::Null),
            (Self::Key(key), response @ Value::Object(_)) => Ok(take_key(response, key)),
            (Self::Key(key), other) => Err(Error::UnexpectedResponse(format!(
                "expected a `{key}` envelope, got {}",
                kind(&other)
            ))),
        }
    }
}

/// Unwrap an array of `{key: item}` envelopes into the items.
///
/// An element without `key` becomes `null`.
///
/// # Errors
///
/// Returns [`Error::UnexpectedResponse`] if `response` is not an array.
pub fn unwrap_envelopes(key: &str, response: Value) -> Result<Vec<Value>> {
    match response {
        Value::Array(items) => Ok(items.into_iter().map(|item| take_key(item, key)).collect()),
        other => Err(Error::UnexpectedResponse(format!(
            "expected an array of `{key}` envelopes, got {}",
            kind(&other)
        ))),
    }
}

fn take_key(value: Value, key: &str) -> Value {
    match value {
        Value::Object(mut map) => map.remove(key).unwrap_or(Value::Null),
        _ => Value::Null,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "an empty body",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Identifiers substituted into a path template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathArgs {
    /// Replaces `{id}`.
    pub id: Option<Identifier>,
    /// Replaces `{network_id}`.
    pub network_id: Option<Identifier>,
}

impl PathArgs {
    /// No identifiers (collection endpoints).
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// A single virtual machine.
    #[must_use]
    pub fn vm(id: impl Into<Identifier>) -> Self {
        Self {
            id: Some(id.into()),
            network_id: None,
        }
    }

    /// Add a network interface identifier.
    #[must_use]
    pub fn with_network(mut self, network_id: impl Into<Identifier>) -> Self {
        self.network_id = Some(network_id.into());
        self
    }
}

/// One row of the endpoint table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    /// HTTP verb.
    pub verb: Verb,
    /// Path template with `{id}` / `{network_id}` placeholders.
    pub path: &'static str,
    /// Where options travel.
    pub placement: Placement,
    /// How the response is unwrapped.
    pub extraction: Extraction,
}

impl Endpoint {
    const fn new(
        verb: Verb,
        path: &'static str,
        placement: Placement,
        extraction: Extraction,
    ) -> Self {
        Self {
            verb,
            path,
            placement,
            extraction,
        }
    }

    /// Substitute identifiers into the template.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] if the template needs an identifier
    /// that `args` does not carry.
    pub fn render_path(&self, args: &PathArgs) -> Result<String> {
        let mut path = self.path.to_string();
        for (placeholder, value) in [("{id}", &args.id), ("{network_id}", &args.network_id)] {
            if !path.contains(placeholder) {
                continue;
            }
            let value = value.as_ref().ok_or_else(|| {
                Error::InvalidRequest(format!("`{}` requires {placeholder}", self.path))
            })?;
            path = path.replace(placeholder, &value.to_string());
        }
        Ok(path)
    }
}

/// Every virtual machine operation the control panel exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VmOperation {
    /// List all virtual machines.
    List,
    /// Get one virtual machine.
    Show,
    /// Create a virtual machine.
    Create,
    /// Build a virtual machine from a template.
    Build,
    /// Edit a virtual machine.
    Edit,
    /// Transfer to another user.
    ChangeOwner,
    /// Reset the root password.
    ChangePassword,
    /// Assign SSH keys of all administrators and the owner.
    SetSshKeys,
    /// Migrate to another hypervisor.
    Migrate,
    /// Toggle VIP status.
    SetVip,
    /// Delete a virtual machine.
    Delete,
    /// Resize memory and CPU.
    Resize,
    /// Suspend or unsuspend.
    Suspend,
    /// Unlock.
    Unlock,
    /// Boot.
    Startup,
    /// Graceful shutdown.
    Shutdown,
    /// Power off.
    Stop,
    /// Reboot, optionally into recovery.
    Reboot,
    /// Keep off the hypervisor of another virtual machine.
    Segregate,
    /// Open a remote console session.
    Console,
    /// Billing statistics.
    Stats,
    /// Transaction log.
    Transactions,
    /// CPU usage statistics.
    CpuUsages,
    /// Network interfaces.
    NetworkInterfaces,
    /// Hourly usage of one network interface.
    NetworkUsages,
}

impl VmOperation {
    /// All operations in table order.
    pub const ALL: [Self; 25] = [
        Self::List,
        Self::Show,
        Self::Create,
        Self::Build,
        Self::Edit,
        Self::ChangeOwner,
        Self::ChangePassword,
        Self::SetSshKeys,
        Self::Migrate,
        Self::SetVip,
        Self::Delete,
        Self::Resize,
        Self::Suspend,
        Self::Unlock,
        Self::Startup,
        Self::Shutdown,
        Self::Stop,
        Self::Reboot,
        Self::Segregate,
        Self::Console,
        Self::Stats,
        Self::Transactions,
        Self::CpuUsages,
        Self::NetworkInterfaces,
        Self::NetworkUsages,
    ];

    /// Snake-case operation name, as used in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Show => "show",
            Self::Create => "create",
            Self::Build => "build",
            Self::Edit => "edit",
            Self::ChangeOwner => "change_owner",
            Self::ChangePassword => "change_password",
            Self::SetSshKeys => "set_ssh_keys",
            Self::Migrate => "migrate",
            Self::SetVip => "set_vip",
            Self::Delete => "delete",
            Self::Resize => "resize",
            Self::Suspend => "suspend",
            Self::Unlock => "unlock",
            Self::Startup => "startup",
            Self::Shutdown => "shutdown",
            Self::Stop => "stop",
            Self::Reboot => "reboot",
            Self::Segregate => "segregate",
            Self::Console => "console",
            Self::Stats => "stats",
            Self::Transactions => "transactions",
            Self::CpuUsages => "cpu_usages",
            Self::NetworkInterfaces => "network_interfaces",
            Self::NetworkUsages => "network_usages",
        }
    }

    /// The endpoint this operation is bound to.
    #[must_use]
    #[rustfmt::skip]
    pub const fn endpoint(self) -> Endpoint {
        use Extraction::{EnvelopeList, FirstValue, Key, Raw};
        use Placement::{Empty, Query, WrappedBody, WrappedQuery};
        use Verb::{Delete, Get, Post, Put};

        const VM: Extraction = Key(VIRTUAL_MACHINE);
        const BODY: Placement = WrappedBody(VIRTUAL_MACHINE);

        match self {
            Self::List => Endpoint::new(Get, "/virtual_machines.json", Empty, EnvelopeList(VIRTUAL_MACHINE)),
            Self::Show => Endpoint::new(Get, "/virtual_machines/{id}.json", Empty, FirstValue),
            Self::Create => Endpoint::new(Post, "/virtual_machines.json", BODY, VM),
            Self::Build => Endpoint::new(Post, "/virtual_machines/{id}/build.json", BODY, FirstValue),
            Self::Edit => Endpoint::new(Put, "/virtual_machines/{id}.json", BODY, VM),
            Self::ChangeOwner => Endpoint::new(Post, "/virtual_machines/{id}/change_owner.json", Query, VM),
            Self::ChangePassword => Endpoint::new(Post, "/virtual_machines/{id}/reset_password.json", Query, VM),
            Self::SetSshKeys => Endpoint::new(Post, "/virtual_machines/{id}/set_ssh_keys.json", Empty, VM),
            Self::Migrate => Endpoint::new(Post, "/virtual_machines/{id}/migrate.json", WrappedQuery(VIRTUAL_MACHINE), Raw),
            Self::SetVip => Endpoint::new(Post, "/virtual_machines/{id}/set_vip.json", Empty, VM),
            Self::Delete => Endpoint::new(Delete, "/virtual_machines/{id}.json", Empty, Raw),
            Self::Resize => Endpoint::new(Post, "/virtual_machines/{id}/resize.json", BODY, VM),
            Self::Suspend => Endpoint::new(Post, "/virtual_machines/{id}/suspend.json", Empty, VM),
            Self::Unlock => Endpoint::new(Post, "/virtual_machines/{id}/unlock.json", Empty, VM),
            Self::Startup => Endpoint::new(Post, "/virtual_machines/{id}/startup.json", Empty, VM),
            Self::Shutdown => Endpoint::new(Post, "/virtual_machines/{id}/shutdown.json", Empty, VM),
            Self::Stop => Endpoint::new(Post, "/virtual_machines/{id}/stop.json", Empty, VM),
            Self::Reboot => Endpoint::new(Post, "/virtual_machines/{id}/reboot.json", Query, VM),
            Self::Segregate => Endpoint::new(Post, "/virtual_machines/{id}/strict_vm.json", BODY, VM),
            Self::Console => Endpoint::new(Get, "/virtual_machines/{id}/console.json", Empty, Key(REMOTE_ACCESS_SESSION)),
            Self::Stats => Endpoint::new(Post, "/virtual_machines/{id}/vm_stats.json", Empty, VM),
            Self::Transactions => Endpoint::new(Get, "/virtual_machines/{id}/transactions.json", Empty, Raw),
            Self::CpuUsages => Endpoint::new(Get, "/virtual_machines/{id}/cpu_usage.json", Empty, Raw),
            Self::NetworkInterfaces => Endpoint::new(Get, "/virtual_machines/{id}/network_interfaces.json", Empty, Raw),
            Self::NetworkUsages => Endpoint::new(Get, "/virtual_machines/{id}/network_interfaces/{network_id}/usage.json", Empty, Raw),
        }
    }
}
