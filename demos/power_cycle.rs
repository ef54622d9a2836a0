use prismpilot::{
    builder::{config::PrismConfigBuilder, vm::VmBuilder, Builder},
    client::PrismClient,
    network::NetworkConfiguration,
    repository::Kind,
};
use tokio::time::{sleep, Duration};
use tracing::info;
use uuid::Uuid;

/// This example creates a VM cloned from an image, waits for it to be
/// created, then powers it on and off again.
///
/// Requirements:
/// - `PRISM_URL`, `PRISM_USERNAME` and `PRISM_PASSWORD` pointing to a Prism
///   endpoint
/// - `PRISM_CLUSTER`, `PRISM_PROJECT`, `PRISM_IMAGE` and `PRISM_SUBNET`
///   holding the names of the entities the VM is created with. The subnet
///   must be managed by the backend, the VM gets its address over DHCP.
///
/// The VM is left powered off once the example is done, delete it from the
/// Prism interface.
fn name_from_env(key: &str) -> Result<String, Box<dyn std::error::Error>> {
    std::env::var(key).map_err(|_| format!("{} is not set", key).into())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let config = PrismConfigBuilder::from_env().try_build()?;
    let client = PrismClient::new(config);

    let cluster = client
        .resolve(Kind::Cluster, &name_from_env("PRISM_CLUSTER")?)
        .await?;
    let project = client
        .resolve(Kind::Project, &name_from_env("PRISM_PROJECT")?)
        .await?;
    let image = client
        .resolve(Kind::Image, &name_from_env("PRISM_IMAGE")?)
        .await?;
    let subnet = client
        .resolve(Kind::Subnet, &name_from_env("PRISM_SUBNET")?)
        .await?;
    let owner = client.current_user_uuid().await?;

    let name = format!("power-cycle-{}", &Uuid::new_v4().simple().to_string()[..8]);
    let request = VmBuilder::new(name.clone())
        .with_description("created by the power_cycle example".to_string())
        .with_cluster(cluster)
        .with_project(project)
        .with_owner(owner)
        .with_image(image)
        .with_subnet(subnet)
        .with_memory_size_mib(2048)
        .with_boot_disk_size("20 GiB".to_string())
        .with_network(NetworkConfiguration::Automatic)
        .try_build()?;

    info!("Create VM {}", name);
    let task = client.create_vm(&request).await?;
    let created = client.wait_for_task(task).await.into_result(task)?;
    let vm = created
        .entity_reference_list
        .unwrap_or_default()
        .into_iter()
        .find(|reference| reference.kind == Kind::Vm.as_str())
        .map(|reference| Uuid::parse_str(&reference.uuid))
        .transpose()?
        .ok_or("creation task does not reference the VM")?;

    info!("Power on VM {}", vm);
    let task = client.power_on(vm).await?;
    client.wait_for_task(task).await.into_result(task)?;

    info!("Waiting a few seconds, the VM is started at this point");
    sleep(Duration::from_secs(30)).await;

    info!("Power off VM {}", vm);
    let task = client.power_off(vm).await?;
    client.wait_for_task(task).await.into_result(task)?;

    Ok(())
}
