use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use client::AppContext;
use client::api::{CustomerFilter, ItemFilter, UserFilter};
use client::storage::FileStorage;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use shared::{
    AccessScope, CompanyCostCenterCreate, CompanyCreate, CompanyUpdate, CostCenterCreate,
    CostCenterUpdate, CustomerAddressCreate, CustomerAddressUpdate, CustomerContactCreate,
    CustomerContactUpdate, CustomerCreate, CustomerUpdate, ItemCreate, ItemKind, ItemUpdate,
    LoginRequest, StoreCreate, StoreUpdate, UserCreate, UserStoreAccessCreate,
    UserStoreAccessUpdate, UserUpdate,
};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

#[derive(Parser, Debug)]
#[command(version, about = "Admin CLI for the TSV retail services platform")]
struct Config {
    #[arg(long, env = "TSV_RSM_API_URL", default_value = "http://localhost:8000")]
    api_url: Url,

    #[arg(long, env = "TSV_RSM_DATA_DIR", help = "Where the session state lives")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "TSV_RSM_PASSWORD")]
        password: String,
    },
    Logout,
    Whoami,
    Refresh,
    UseStore {
        store_id: i64,
    },
    ClearStore,
    Health,
    #[command(subcommand)]
    Companies(CompaniesCommand),
    #[command(subcommand)]
    Stores(StoresCommand),
    #[command(subcommand)]
    CostCenters(CostCentersCommand),
    #[command(subcommand)]
    Customers(CustomersCommand),
    #[command(subcommand)]
    Items(ItemsCommand),
    #[command(subcommand)]
    ServiceTypes(ServiceTypesCommand),
    #[command(subcommand)]
    Users(UsersCommand),
}

#[derive(Subcommand, Debug)]
enum CompaniesCommand {
    List,
    Get {
        id: i64,
    },
    Create {
        #[arg(help = "JSON payload file")]
        file: PathBuf,
    },
    Update {
        id: i64,
        file: PathBuf,
    },
    Delete {
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
enum StoresCommand {
    List,
    Get {
        id: i64,
    },
    Create {
        file: PathBuf,
    },
    Update {
        id: i64,
        file: PathBuf,
    },
    Delete {
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
enum CostCentersCommand {
    List {
        #[arg(long)]
        active_only: bool,
    },
    Get {
        id: i64,
    },
    Create {
        file: PathBuf,
    },
    Update {
        id: i64,
        file: PathBuf,
    },
    Delete {
        id: i64,
    },
    Assignments {
        company_id: i64,
    },
    Assign {
        company_id: i64,
        cost_center_id: i64,
        #[arg(long)]
        default: bool,
    },
    Unassign {
        company_id: i64,
        assignment_id: i64,
    },
}

#[derive(Subcommand, Debug)]
enum CustomersCommand {
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    Get {
        id: i64,
    },
    Create {
        file: PathBuf,
    },
    Update {
        id: i64,
        file: PathBuf,
    },
    Delete {
        id: i64,
    },
    Contacts {
        customer_id: i64,
    },
    AddContact {
        customer_id: i64,
        file: PathBuf,
    },
    UpdateContact {
        customer_id: i64,
        contact_id: i64,
        file: PathBuf,
    },
    RemoveContact {
        customer_id: i64,
        contact_id: i64,
    },
    Addresses {
        customer_id: i64,
    },
    AddAddress {
        customer_id: i64,
        file: PathBuf,
    },
    UpdateAddress {
        customer_id: i64,
        address_id: i64,
        file: PathBuf,
    },
    RemoveAddress {
        customer_id: i64,
        address_id: i64,
    },
}

#[derive(Subcommand, Debug)]
enum ItemsCommand {
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        kind: Option<ItemKind>,
    },
    Get {
        id: i64,
    },
    Create {
        file: PathBuf,
    },
    Update {
        id: i64,
        file: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum ServiceTypesCommand {
    List,
}

#[derive(Subcommand, Debug)]
enum UsersCommand {
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        skip: Option<i64>,
        #[arg(long)]
        limit: Option<i64>,
    },
    Get {
        id: i64,
    },
    Create {
        file: PathBuf,
    },
    Update {
        id: i64,
        file: PathBuf,
    },
    Delete {
        id: i64,
    },
    AssignRole {
        user_id: i64,
        role_id: i64,
    },
    RemoveRole {
        user_id: i64,
        role_id: i64,
    },
    Stores {
        user_id: i64,
    },
    GrantStore {
        user_id: i64,
        store_id: i64,
        #[arg(long, default_value = "view")]
        scope: AccessScope,
    },
    UpdateStore {
        user_id: i64,
        store_id: i64,
        scope: AccessScope,
    },
    RevokeStore {
        user_id: i64,
        store_id: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .init();

    let data_dir = match config.data_dir {
        Some(dir) => dir,
        None => FileStorage::default_dir()
            .context("Cannot resolve a home directory, pass --data-dir")?,
    };
    let storage = Arc::new(FileStorage::open(&data_dir)?);
    let context = AppContext::new(config.api_url, storage);

    run(&context, config.command).await
}

async fn run(context: &AppContext, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Login { email, password } => {
            let credentials = LoginRequest::new(email, password);
            let user = context.session.login(&credentials).await?;
            println!(
                "Signed in as {email}, user_id: {user_id}",
                email = user.email,
                user_id = user.id
            );
            match context.scope.selected_store() {
                Some(access) => println!(
                    "Active store: {name} ({store_id})",
                    name = access.store.name,
                    store_id = access.store_id
                ),
                None => println!("No store access granted"),
            }
            Ok(())
        }
        Command::Logout => {
            context.session.logout().await;
            println!("Signed out");
            Ok(())
        }
        Command::Whoami => {
            ensure_session(context).await?;
            print_json(&json!({
                "user": context.session.current_user(),
                "selected_store": context.scope.selected_store(),
                "available_stores": context.scope.available_stores(),
            }))
        }
        Command::Refresh => {
            let user = context.session.refresh().await?;
            println!(
                "Token refreshed for {email}, user_id: {user_id}",
                email = user.email,
                user_id = user.id
            );
            Ok(())
        }
        Command::UseStore { store_id } => {
            ensure_session(context).await?;
            context.scope.select_store(store_id);
            match context.scope.selected_store() {
                Some(access) if access.store_id == store_id => {
                    println!("Active store: {name} ({store_id})", name = access.store.name);
                    Ok(())
                }
                _ => bail!("Store {store_id} is not accessible for this user"),
            }
        }
        Command::ClearStore => {
            ensure_session(context).await?;
            context.scope.clear_store();
            println!("Store selection cleared");
            Ok(())
        }
        Command::Health => {
            let health = context.api.health();
            print_json(&json!({
                "api": context.api.base_url(),
                "health": health.health().await?,
                "ready": health.ready().await?,
            }))
        }
        Command::Companies(command) => {
            ensure_session(context).await?;
            run_companies(context, command).await
        }
        Command::Stores(command) => {
            ensure_session(context).await?;
            run_stores(context, command).await
        }
        Command::CostCenters(command) => {
            ensure_session(context).await?;
            run_cost_centers(context, command).await
        }
        Command::Customers(command) => {
            ensure_session(context).await?;
            run_customers(context, command).await
        }
        Command::Items(command) => {
            ensure_session(context).await?;
            run_items(context, command).await
        }
        Command::ServiceTypes(command) => {
            ensure_session(context).await?;
            run_service_types(context, command).await
        }
        Command::Users(command) => {
            ensure_session(context).await?;
            run_users(context, command).await
        }
    }
}

async fn ensure_session(context: &AppContext) -> anyhow::Result<()> {
    if context.session.initialize().await {
        Ok(())
    } else {
        bail!("Not signed in, run: tsv-rsm login")
    }
}

async fn run_companies(context: &AppContext, command: CompaniesCommand) -> anyhow::Result<()> {
    let api = context.api.companies();
    match command {
        CompaniesCommand::List => print_json(&api.list().await?),
        CompaniesCommand::Get { id } => print_json(&api.get(id).await?),
        CompaniesCommand::Create { file } => {
            let payload: CompanyCreate = read_json(&file)?;
            print_json(&api.create(&payload).await?)
        }
        CompaniesCommand::Update { id, file } => {
            let payload: CompanyUpdate = read_json(&file)?;
            print_json(&api.update(id, &payload).await?)
        }
        CompaniesCommand::Delete { id } => {
            api.delete(id).await?;
            println!("Company {id} deactivated");
            Ok(())
        }
    }
}

async fn run_stores(context: &AppContext, command: StoresCommand) -> anyhow::Result<()> {
    let api = context.api.stores();
    match command {
        StoresCommand::List => print_json(&api.list().await?),
        StoresCommand::Get { id } => print_json(&api.get(id).await?),
        StoresCommand::Create { file } => {
            let payload: StoreCreate = read_json(&file)?;
            print_json(&api.create(&payload).await?)
        }
        StoresCommand::Update { id, file } => {
            let payload: StoreUpdate = read_json(&file)?;
            print_json(&api.update(id, &payload).await?)
        }
        StoresCommand::Delete { id } => {
            api.delete(id).await?;
            println!("Store {id} deactivated");
            Ok(())
        }
    }
}

async fn run_cost_centers(
    context: &AppContext,
    command: CostCentersCommand,
) -> anyhow::Result<()> {
    let api = context.api.cost_centers();
    match command {
        CostCentersCommand::List { active_only } => print_json(&api.list(active_only).await?),
        CostCentersCommand::Get { id } => print_json(&api.get(id).await?),
        CostCentersCommand::Create { file } => {
            let payload: CostCenterCreate = read_json(&file)?;
            print_json(&api.create(&payload).await?)
        }
        CostCentersCommand::Update { id, file } => {
            let payload: CostCenterUpdate = read_json(&file)?;
            print_json(&api.update(id, &payload).await?)
        }
        CostCentersCommand::Delete { id } => {
            api.delete(id).await?;
            println!("Cost center {id} deactivated");
            Ok(())
        }
        CostCentersCommand::Assignments { company_id } => {
            print_json(&api.assignments(company_id).await?)
        }
        CostCentersCommand::Assign {
            company_id,
            cost_center_id,
            default,
        } => {
            let assignment = CompanyCostCenterCreate {
                cost_center_id,
                is_default: default,
            };
            print_json(&api.assign(company_id, &assignment).await?)
        }
        CostCentersCommand::Unassign {
            company_id,
            assignment_id,
        } => {
            api.unassign(company_id, assignment_id).await?;
            println!("Assignment {assignment_id} removed from company {company_id}");
            Ok(())
        }
    }
}

async fn run_customers(context: &AppContext, command: CustomersCommand) -> anyhow::Result<()> {
    let api = context.api.customers();
    match command {
        CustomersCommand::List { search, status } => {
            let filter = CustomerFilter { search, status };
            print_json(&api.list(&filter).await?)
        }
        CustomersCommand::Get { id } => print_json(&api.get(id).await?),
        CustomersCommand::Create { file } => {
            let payload: CustomerCreate = read_json(&file)?;
            print_json(&api.create(&payload).await?)
        }
        CustomersCommand::Update { id, file } => {
            let payload: CustomerUpdate = read_json(&file)?;
            print_json(&api.update(id, &payload).await?)
        }
        CustomersCommand::Delete { id } => {
            api.delete(id).await?;
            println!("Customer {id} deactivated");
            Ok(())
        }
        CustomersCommand::Contacts { customer_id } => print_json(&api.contacts(customer_id).await?),
        CustomersCommand::AddContact { customer_id, file } => {
            let payload: CustomerContactCreate = read_json(&file)?;
            print_json(&api.add_contact(customer_id, &payload).await?)
        }
        CustomersCommand::UpdateContact {
            customer_id,
            contact_id,
            file,
        } => {
            let payload: CustomerContactUpdate = read_json(&file)?;
            print_json(&api.update_contact(customer_id, contact_id, &payload).await?)
        }
        CustomersCommand::RemoveContact {
            customer_id,
            contact_id,
        } => {
            api.remove_contact(customer_id, contact_id).await?;
            println!("Contact {contact_id} removed from customer {customer_id}");
            Ok(())
        }
        CustomersCommand::Addresses { customer_id } => {
            print_json(&api.addresses(customer_id).await?)
        }
        CustomersCommand::AddAddress { customer_id, file } => {
            let payload: CustomerAddressCreate = read_json(&file)?;
            print_json(&api.add_address(customer_id, &payload).await?)
        }
        CustomersCommand::UpdateAddress {
            customer_id,
            address_id,
            file,
        } => {
            let payload: CustomerAddressUpdate = read_json(&file)?;
            print_json(&api.update_address(customer_id, address_id, &payload).await?)
        }
        CustomersCommand::RemoveAddress {
            customer_id,
            address_id,
        } => {
            api.remove_address(customer_id, address_id).await?;
            println!("Address {address_id} removed from customer {customer_id}");
            Ok(())
        }
    }
}

async fn run_items(context: &AppContext, command: ItemsCommand) -> anyhow::Result<()> {
    let api = context.api.items();
    match command {
        ItemsCommand::List {
            search,
            status,
            kind,
        } => {
            let filter = ItemFilter {
                search,
                status,
                kind,
            };
            print_json(&api.list(&filter).await?)
        }
        ItemsCommand::Get { id } => print_json(&api.get(id).await?),
        ItemsCommand::Create { file } => {
            let payload: ItemCreate = read_json(&file)?;
            print_json(&api.create(&payload).await?)
        }
        ItemsCommand::Update { id, file } => {
            let payload: ItemUpdate = read_json(&file)?;
            print_json(&api.update(id, &payload).await?)
        }
    }
}

async fn run_service_types(
    context: &AppContext,
    command: ServiceTypesCommand,
) -> anyhow::Result<()> {
    let api = context.api.service_types();
    match command {
        ServiceTypesCommand::List => print_json(&api.list().await?),
    }
}

async fn run_users(context: &AppContext, command: UsersCommand) -> anyhow::Result<()> {
    let api = context.api.users();
    match command {
        UsersCommand::List {
            search,
            status,
            skip,
            limit,
        } => {
            let filter = UserFilter {
                search,
                status,
                skip,
                limit,
            };
            print_json(&api.list(&filter).await?)
        }
        UsersCommand::Get { id } => print_json(&api.get(id).await?),
        UsersCommand::Create { file } => {
            let payload: UserCreate = read_json(&file)?;
            print_json(&api.create(&payload).await?)
        }
        UsersCommand::Update { id, file } => {
            let payload: UserUpdate = read_json(&file)?;
            print_json(&api.update(id, &payload).await?)
        }
        UsersCommand::Delete { id } => {
            api.delete(id).await?;
            println!("User {id} deactivated");
            Ok(())
        }
        UsersCommand::AssignRole { user_id, role_id } => {
            print_json(&api.assign_role(user_id, role_id).await?)
        }
        UsersCommand::RemoveRole { user_id, role_id } => {
            api.remove_role(user_id, role_id).await?;
            println!("Role {role_id} removed from user {user_id}");
            Ok(())
        }
        UsersCommand::Stores { user_id } => print_json(&api.store_accesses(user_id).await?),
        UsersCommand::GrantStore {
            user_id,
            store_id,
            scope,
        } => {
            let access = UserStoreAccessCreate { store_id, scope };
            print_json(&api.grant_store_access(user_id, &access).await?)
        }
        UsersCommand::UpdateStore {
            user_id,
            store_id,
            scope,
        } => {
            let update = UserStoreAccessUpdate { scope };
            print_json(&api.update_store_access(user_id, store_id, &update).await?)
        }
        UsersCommand::RevokeStore { user_id, store_id } => {
            api.revoke_store_access(user_id, store_id).await?;
            println!("Store {store_id} access revoked for user {user_id}");
            Ok(())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let file =
        File::open(path).with_context(|| format!("Cannot open {path}", path = path.display()))?;
    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}
