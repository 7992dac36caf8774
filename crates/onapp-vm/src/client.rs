//! Asynchronous virtual machine client.

use crate::endpoints::{unwrap_envelopes, PathArgs, VmOperation, VIRTUAL_MACHINE};
use crate::models::{Identifier, Options};
use crate::Result;
use onapp_core::client::{
    ClientConfig, RetryPolicy, ServiceClient, ServiceClientBuilder, DEFAULT_TIMEOUT,
};
use onapp_core::{ApiRequester, OnAppConfig};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("onapp-vm/", env!("CARGO_PKG_VERSION"));

/// Builder for [`VirtualMachineClient`].
#[derive(Debug, Clone)]
pub struct VirtualMachineClientBuilder {
    inner: ServiceClientBuilder,
}

impl VirtualMachineClientBuilder {
    /// Create a builder for the specified control panel URL.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let builder = ServiceClientBuilder::new(base_url, Duration::from_secs(DEFAULT_TIMEOUT))?
            .with_user_agent(USER_AGENT);

        Ok(Self { inner: builder })
    }

    /// Override the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.inner = self.inner.with_retry_policy(retry);
        self
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.inner = self.inner.with_http_config(config);
        self
    }

    /// Configure HTTP basic authentication credentials.
    #[must_use]
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        self.inner = self.inner.with_basic_auth(username, api_key);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<VirtualMachineClient> {
        let inner = self.inner.build()?;
        Ok(VirtualMachineClient::with_requester(Arc::new(inner)))
    }
}

/// Virtual machine bindings.
///
/// Every method is one request through the shared [`ApiRequester`]; errors
/// from it are returned untouched.
#[derive(Clone)]
pub struct VirtualMachineClient {
    requester: Arc<dyn ApiRequester>,
}

impl VirtualMachineClient {
    /// Construct a client directly from the control panel URL.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        VirtualMachineClientBuilder::new(base_url)?.build()
    }

    /// Construct a client from a loaded configuration.
    pub fn from_config(config: &OnAppConfig) -> Result<Self> {
        let inner = ServiceClient::from_config(config)?;
        Ok(Self::with_requester(Arc::new(inner)))
    }

    /// Use an existing base client, possibly shared with other bindings.
    #[must_use]
    pub fn with_requester(requester: Arc<dyn ApiRequester>) -> Self {
        Self { requester }
    }

    /// Run any operation from the endpoint table.
    ///
    /// Options are ignored by endpoints that send no parameters.
    pub async fn execute(
        &self,
        operation: VmOperation,
        args: &PathArgs,
        options: Options,
    ) -> Result<Value> {
        let response = self.send(operation, args, options).await?;
        operation.endpoint().extraction.extract(response)
    }

    async fn send(
        &self,
        operation: VmOperation,
        args: &PathArgs,
        options: Options,
    ) -> Result<Value> {
        let endpoint = operation.endpoint();
        let path = endpoint.render_path(args)?;
        let payload = endpoint.placement.payload(options);

        debug!(operation = operation.name(), path = %path, "virtual machine request");
        self.requester
            .request(endpoint.verb.method(), &path, payload)
            .await
    }

    async fn on_vm(&self, operation: VmOperation, id: impl Into<Identifier>) -> Result<Value> {
        self.execute(operation, &PathArgs::vm(id), Options::new())
            .await
    }

    /// List all virtual machines.
    pub async fn list(&self) -> Result<Vec<Value>> {
        let response = self
            .send(VmOperation::List, &PathArgs::none(), Options::new())
            .await?;
        unwrap_envelopes(VIRTUAL_MACHINE, response)
    }

    /// Get a virtual machine.
    pub async fn show(&self, id: impl Into<Identifier>) -> Result<Value> {
        self.on_vm(VmOperation::Show, id).await
    }

    /// Create a virtual machine.
    ///
    /// Common options: `label`, `hostname`, `memory`, `cpus`, `cpu_shares`,
    /// `primary_disk_size`, `swap_disk_size`, `template_id`,
    /// `hypervisor_id`, `hypervisor_group_id`, `primary_network_id`,
    /// `initial_root_password`, `rate_limit`,
    /// `required_virtual_machine_build`, `required_ip_address_assignment`,
    /// `required_automatic_backup`, `note`, `admin_note`.
    pub async fn create(&self, options: Options) -> Result<Value> {
        self.execute(VmOperation::Create, &PathArgs::none(), options)
            .await
    }

    /// Build a virtual machine (`template_id`, `required_startup`).
    pub async fn build(&self, id: impl Into<Identifier>, options: Options) -> Result<Value> {
        self.execute(VmOperation::Build, &PathArgs::vm(id), options)
            .await
    }

    /// Edit a virtual machine; accepts the same options as [`Self::create`].
    pub async fn edit(&self, id: impl Into<Identifier>, options: Options) -> Result<Value> {
        self.execute(VmOperation::Edit, &PathArgs::vm(id), options)
            .await
    }

    /// Change the owner of a virtual machine.
    pub async fn change_owner(
        &self,
        id: impl Into<Identifier>,
        user_id: impl Into<Identifier>,
    ) -> Result<Value> {
        let user_id: Identifier = user_id.into();
        let options = Options::new().with("user_id", user_id);
        self.execute(VmOperation::ChangeOwner, &PathArgs::vm(id), options)
            .await
    }

    /// Reset the root password.
    pub async fn change_password(
        &self,
        id: impl Into<Identifier>,
        password: impl Into<String>,
    ) -> Result<Value> {
        let password: String = password.into();
        let options = Options::new().with("new_password", password);
        self.execute(VmOperation::ChangePassword, &PathArgs::vm(id), options)
            .await
    }

    /// Assign the SSH keys of all administrators and the owner.
    pub async fn set_ssh_keys(&self, id: impl Into<Identifier>) -> Result<Value> {
        self.on_vm(VmOperation::SetSshKeys, id).await
    }

    /// Migrate to another hypervisor (`destination`,
    /// `cold_migrate_on_rollback`). Returns the raw response.
    pub async fn migrate(&self, id: impl Into<Identifier>, options: Options) -> Result<Value> {
        self.execute(VmOperation::Migrate, &PathArgs::vm(id), options)
            .await
    }

    /// Toggle VIP status.
    pub async fn set_vip(&self, id: impl Into<Identifier>) -> Result<Value> {
        self.on_vm(VmOperation::SetVip, id).await
    }

    /// Delete a virtual machine. Returns the raw response.
    pub async fn delete(&self, id: impl Into<Identifier>) -> Result<Value> {
        self.on_vm(VmOperation::Delete, id).await
    }

    /// Resize (`memory`, `cpus`, `cpu_shares`, `allow_cold_resize`).
    pub async fn resize(&self, id: impl Into<Identifier>, options: Options) -> Result<Value> {
        self.execute(VmOperation::Resize, &PathArgs::vm(id), options)
            .await
    }

    /// Suspend or unsuspend.
    pub async fn suspend(&self, id: impl Into<Identifier>) -> Result<Value> {
        self.on_vm(VmOperation::Suspend, id).await
    }

    /// Unlock.
    pub async fn unlock(&self, id: impl Into<Identifier>) -> Result<Value> {
        self.on_vm(VmOperation::Unlock, id).await
    }

    /// Boot.
    pub async fn startup(&self, id: impl Into<Identifier>) -> Result<Value> {
        self.on_vm(VmOperation::Startup, id).await
    }

    /// Shut down gracefully.
    pub async fn shutdown(&self, id: impl Into<Identifier>) -> Result<Value> {
        self.on_vm(VmOperation::Shutdown, id).await
    }

    /// Power off.
    pub async fn stop(&self, id: impl Into<Identifier>) -> Result<Value> {
        self.on_vm(VmOperation::Stop, id).await
    }

    /// Reboot, into recovery mode when `recovery` is set.
    pub async fn reboot(&self, id: impl Into<Identifier>, recovery: bool) -> Result<Value> {
        let mut options = Options::new();
        if recovery {
            options.insert("mode", "recovery");
        }
        self.execute(VmOperation::Reboot, &PathArgs::vm(id), options)
            .await
    }

    /// Keep `id` off the hypervisor running `target_id`.
    pub async fn segregate(
        &self,
        id: impl Into<Identifier>,
        target_id: impl Into<Identifier>,
    ) -> Result<Value> {
        let target_id: Identifier = target_id.into();
        let options = Options::new().with("strict_virtual_machine_id", target_id);
        self.execute(VmOperation::Segregate, &PathArgs::vm(id), options)
            .await
    }

    /// Open a console; returns the remote access session.
    pub async fn console(&self, id: impl Into<Identifier>) -> Result<Value> {
        self.on_vm(VmOperation::Console, id).await
    }

    /// Billing statistics.
    pub async fn stats(&self, id: impl Into<Identifier>) -> Result<Value> {
        self.on_vm(VmOperation::Stats, id).await
    }

    /// Transaction log, as returned.
    pub async fn transactions(&self, id: impl Into<Identifier>) -> Result<Value> {
        self.on_vm(VmOperation::Transactions, id).await
    }

    /// CPU usage statistics, as returned.
    pub async fn cpu_usages(&self, id: impl Into<Identifier>) -> Result<Value> {
        self.on_vm(VmOperation::CpuUsages, id).await
    }

    /// Network interfaces, as returned.
    pub async fn network_interfaces(&self, id: impl Into<Identifier>) -> Result<Value> {
        self.on_vm(VmOperation::NetworkInterfaces, id).await
    }

    /// Hourly usage of one network interface, as returned.
    pub async fn network_usages(
        &self,
        id: impl Into<Identifier>,
        network_id: impl Into<Identifier>,
    ) -> Result<Value> {
        let args = PathArgs::vm(id).with_network(network_id);
        self.execute(VmOperation::NetworkUsages, &args, Options::new())
            .await
    }
}
