use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use market_client::models::{
    LeadInput, LeadSearch, Pagination, Vehicle, VehicleInput, VehicleSearch,
};
use market_client::{DEFAULT_TOKEN_FILE, MarketClient, MarketClientHttp, TokenStore};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "market", about = "Vehicle marketplace command line")]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:8080")]
    server: String,

    #[arg(long, default_value = DEFAULT_TOKEN_FILE)]
    token_file: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    Me,
    /// Browse active listings, or your own with --mine.
    List {
        #[arg(long)]
        mine: bool,
        #[command(flatten)]
        filter: SearchArgs,
    },
    Show {
        id: Uuid,
        /// Fetch the owner view (includes plate and lead count).
        #[arg(long)]
        mine: bool,
    },
    Create {
        #[command(flatten)]
        fields: VehicleArgs,
    },
    Update {
        id: Uuid,
        #[command(flatten)]
        fields: VehicleArgs,
        /// ACTIVE, INACTIVE or SOLD.
        #[arg(long)]
        status: Option<String>,
    },
    Delete {
        id: Uuid,
    },
    /// Register interest in a listing, as the storefront's contact button does.
    Contact {
        vehicle_id: Uuid,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        utm_source: Option<String>,
        #[arg(long)]
        utm_medium: Option<String>,
        #[arg(long)]
        utm_campaign: Option<String>,
    },
    Leads {
        #[arg(long)]
        vehicle_id: Option<Uuid>,
        #[arg(long)]
        start_date: Option<String>,
        #[arg(long)]
        end_date: Option<String>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },
    Stats,
}

#[derive(Args, Debug)]
struct SearchArgs {
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    min_price: Option<f64>,
    #[arg(long)]
    max_price: Option<f64>,
    #[arg(long)]
    min_year: Option<i32>,
    #[arg(long)]
    max_year: Option<i32>,
    #[arg(long)]
    fuel: Option<String>,
    #[arg(long)]
    transmission: Option<String>,
    #[arg(long)]
    status: Option<String>,
    #[arg(long)]
    plate: Option<String>,
    #[arg(long)]
    page: Option<u32>,
    #[arg(long)]
    limit: Option<u32>,
}

#[derive(Args, Debug)]
struct VehicleArgs {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    price: Option<f64>,
    #[arg(long)]
    year: Option<i32>,
    #[arg(long)]
    mileage_km: Option<i32>,
    #[arg(long)]
    fuel: Option<String>,
    #[arg(long)]
    transmission: Option<String>,
    #[arg(long)]
    color: Option<String>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    plate: Option<String>,
    /// Repeat for each image; order is kept.
    #[arg(long = "image")]
    images: Vec<String>,
}

impl From<SearchArgs> for VehicleSearch {
    fn from(a: SearchArgs) -> Self {
        VehicleSearch {
            search: a.search,
            min_price: a.min_price,
            max_price: a.max_price,
            min_year: a.min_year,
            max_year: a.max_year,
            fuel: a.fuel,
            transmission: a.transmission,
            status: a.status,
            plate: a.plate,
            page: a.page,
            limit: a.limit,
        }
    }
}

impl VehicleArgs {
    fn into_input(self, status: Option<String>) -> VehicleInput {
        VehicleInput {
            title: self.title,
            price: self.price,
            year: self.year,
            mileage_km: self.mileage_km,
            fuel: self.fuel,
            transmission: self.transmission,
            color: self.color,
            location: self.location,
            description: self.description,
            plate: self.plate,
            status,
            images: (!self.images.is_empty()).then_some(self.images),
        }
    }
}

fn print_vehicle(v: &Vehicle) {
    println!(
        "- [{}] {} ({}) R$ {:.2} | {} km | {} | {}",
        v.id, v.title, v.year, v.price, v.mileage_km, v.location, v.status
    );
}

fn print_pagination(p: &Pagination) {
    println!("page {}/{} ({} total)", p.page, p.pages.max(1), p.total);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let mut client = MarketClientHttp::connect(&args.server, TokenStore::new(args.token_file))
        .context("failed to create client")?;

    match args.command {
        Command::Register {
            name,
            email,
            password,
        } => {
            let user = client.register(name, email, password).await?;
            println!("Registered as {} <{}>", user.name, user.email);
        }
        Command::Login { email, password } => {
            let user = client.login(email, password).await?;
            println!("Logged in as {}", user.name);
        }
        Command::Logout => {
            client.logout()?;
            println!("Logged out");
        }
        Command::Me => {
            let user = client.me().await?;
            println!("{} <{}> id={}", user.name, user.email, user.id);
        }
        Command::List { mine, filter } => {
            let search = VehicleSearch::from(filter);
            let page = if mine {
                client.list_owned(&search).await?
            } else {
                client.list_public(&search).await?
            };
            for vehicle in &page.vehicles {
                print_vehicle(vehicle);
            }
            print_pagination(&page.pagination);
        }
        Command::Show { id, mine } => {
            let vehicle = if mine {
                client.get_vehicle(id).await?
            } else {
                client.get_public(id).await?
            };
            print_vehicle(&vehicle);
            println!("  {} / {} / {}", vehicle.fuel, vehicle.transmission, vehicle.color);
            println!("  {}", vehicle.description);
            if let Some(plate) = &vehicle.plate {
                println!("  plate: {}", plate);
            }
            if let Some(leads) = vehicle.lead_count {
                println!("  leads: {}", leads);
            }
            for image in &vehicle.images {
                println!("  image {}: {}", image.position, image.url);
            }
        }
        Command::Create { fields } => {
            let vehicle = client.create_vehicle(&fields.into_input(None)).await?;
            println!("Vehicle created! ID: {} slug: {}", vehicle.id, vehicle.slug);
        }
        Command::Update { id, fields, status } => {
            let vehicle = client.update_vehicle(id, &fields.into_input(status)).await?;
            print_vehicle(&vehicle);
        }
        Command::Delete { id } => {
            client.delete_vehicle(id).await?;
            println!("Vehicle deleted");
        }
        Command::Contact {
            vehicle_id,
            name,
            utm_source,
            utm_medium,
            utm_campaign,
        } => {
            let receipt = client
                .create_lead(&LeadInput {
                    vehicle_id,
                    client_name: name,
                    utm_source,
                    utm_medium,
                    utm_campaign,
                })
                .await?;
            println!("Lead {} registered for {}", receipt.id, receipt.vehicle_title);
        }
        Command::Leads {
            vehicle_id,
            start_date,
            end_date,
            page,
            limit,
        } => {
            let leads = client
                .list_leads(&LeadSearch {
                    vehicle_id,
                    start_date,
                    end_date,
                    page,
                    limit,
                })
                .await?;
            for lead in &leads.leads {
                println!(
                    "- {} {} via {}/{}/{} {}",
                    lead.created_at.format("%Y-%m-%d %H:%M"),
                    lead.vehicle.title,
                    lead.utm_source,
                    lead.utm_medium,
                    lead.utm_campaign,
                    lead.client_name.as_deref().unwrap_or("")
                );
            }
            print_pagination(&leads.pagination);
        }
        Command::Stats => {
            let stats = client.lead_stats().await?;
            println!(
                "Leads: {} total, {} in the last 30 days",
                stats.total_leads, stats.leads_last_30_days
            );
            println!("Top vehicles:");
            for top in &stats.top_vehicles {
                println!("  {:>4}  {}", top.lead_count, top.vehicle.title);
            }
            println!("By source:");
            for source in &stats.leads_by_source {
                println!("  {:>4}  {}", source.count, source.source);
            }
        }
    }

    Ok(())
}
