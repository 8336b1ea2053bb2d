use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use colored::{ColoredString, Colorize};
use eyre::Result;
use salon_query::{
    Config, DateRange, InventoryStats, Notification, NotificationFilter, NotificationKind, NotificationSortField,
    NotificationStats, NotificationStatus, Product, ProductFilter, ProductSortField, ProductStatus, QueryResult,
    Recipient, SortDirection, SortSpec, load_collection, query,
};
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser)]
#[command(name = "salon-query")]
#[command(about = "Filter, sort and summarize salon inventory and notification snapshots")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Path to the config file (default: <config dir>/salon-query/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Current store; overrides tienda_actual from the config
    #[arg(short, long, global = true)]
    tienda: Option<String>,

    /// Print items and aggregates as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query an inventory snapshot
    Productos {
        /// JSON array, {"data": [...]} envelope or JSONL file
        file: PathBuf,

        #[command(flatten)]
        filtros: ProductArgs,

        /// Sort field
        #[arg(long, value_enum)]
        orden: Option<ProductSortField>,

        /// Sort descending
        #[arg(long, requires = "orden")]
        desc: bool,
    },

    /// Query a notification snapshot
    Notificaciones {
        /// JSON array, {"data": [...]} envelope or JSONL file
        file: PathBuf,

        #[command(flatten)]
        filtros: NotificationArgs,

        /// Sort field
        #[arg(long, value_enum)]
        orden: Option<NotificationSortField>,

        /// Sort descending
        #[arg(long, requires = "orden")]
        desc: bool,
    },

    /// Print the effective configuration
    Config,
}

#[derive(Args)]
struct ProductArgs {
    /// Text to look for in nombre, descripcion, codigo or marca
    #[arg(short = 'q', long)]
    busqueda: Option<String>,

    #[arg(long)]
    categoria: Option<String>,

    #[arg(long, value_enum)]
    estado: Option<ProductStatus>,

    #[arg(long)]
    marca: Option<String>,

    /// Only products at or below their minimum stock (and not empty)
    #[arg(long)]
    stock_bajo: bool,

    /// Only products with no stock
    #[arg(long)]
    sin_stock: bool,

    #[arg(long)]
    destacados: bool,

    #[arg(long)]
    precio_min: Option<f64>,

    #[arg(long)]
    precio_max: Option<f64>,

    /// Created on or after (YYYY-MM-DD or RFC 3339)
    #[arg(long)]
    creado_desde: Option<String>,

    /// Created on or before
    #[arg(long)]
    creado_hasta: Option<String>,

    /// Expires on or after
    #[arg(long)]
    vence_desde: Option<String>,

    /// Expires on or before
    #[arg(long)]
    vence_hasta: Option<String>,
}

impl From<ProductArgs> for ProductFilter {
    fn from(args: ProductArgs) -> Self {
        Self {
            busqueda: args.busqueda,
            categoria_id: args.categoria,
            estado: args.estado,
            marca: args.marca,
            stock_bajo: args.stock_bajo,
            sin_stock: args.sin_stock,
            destacados: args.destacados,
            precio_min: args.precio_min,
            precio_max: args.precio_max,
            fecha_creacion: DateRange::from_bounds(args.creado_desde, args.creado_hasta),
            fecha_vencimiento: DateRange::from_bounds(args.vence_desde, args.vence_hasta),
        }
    }
}

#[derive(Args)]
struct NotificationArgs {
    /// Text to look for in titulo or mensaje
    #[arg(short = 'q', long)]
    busqueda: Option<String>,

    #[arg(long, value_enum)]
    tipo: Option<NotificationKind>,

    #[arg(long, value_enum)]
    estado: Option<NotificationStatus>,

    #[arg(long, value_enum)]
    destinatario: Option<Recipient>,

    #[arg(long)]
    destinatario_id: Option<String>,

    /// Only notifications still waiting on a scheduled date
    #[arg(long)]
    programadas: bool,

    #[arg(long)]
    creada_desde: Option<String>,

    #[arg(long)]
    creada_hasta: Option<String>,

    #[arg(long)]
    programada_desde: Option<String>,

    #[arg(long)]
    programada_hasta: Option<String>,
}

impl From<NotificationArgs> for NotificationFilter {
    fn from(args: NotificationArgs) -> Self {
        Self {
            busqueda: args.busqueda,
            tipo: args.tipo,
            estado: args.estado,
            destinatario: args.destinatario,
            destinatario_id: args.destinatario_id,
            programadas: args.programadas,
            fecha_creacion: DateRange::from_bounds(args.creada_desde, args.creada_hasta),
            fecha_programada: DateRange::from_bounds(args.programada_desde, args.programada_hasta),
        }
    }
}

fn sort_spec<F>(orden: Option<F>, desc: bool) -> Option<SortSpec<F>> {
    orden.map(|field| SortSpec {
        field,
        direction: if desc { SortDirection::Desc } else { SortDirection::Asc },
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;

    // Setup tracing; stdout is reserved for results
    tracing_subscriber::fmt()
        .with_max_level(config.log_level()?)
        .with_writer(std::io::stderr)
        .init();
    debug!(?config, "Effective config");

    let ctx = config.query_context(cli.tienda.clone(), Utc::now());

    match cli.command {
        Commands::Productos {
            file,
            filtros,
            orden,
            desc,
        } => {
            let products: Vec<Product> = load_collection(&file)?;
            let filter = ProductFilter::from(filtros);
            let sort = sort_spec(orden, desc);
            let result = query(&products, &filter, sort.as_ref(), &ctx);

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_products(&result);
            }
        }
        Commands::Notificaciones {
            file,
            filtros,
            orden,
            desc,
        } => {
            let notifications: Vec<Notification> = load_collection(&file)?;
            let filter = NotificationFilter::from(filtros);
            let sort = sort_spec(orden, desc);
            let result = query(&notifications, &filter, sort.as_ref(), &ctx);

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_notifications(&result);
            }
        }
        Commands::Config => {
            print!("{}", serde_yaml::to_string(&config)?);
        }
    }

    Ok(())
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let mut out: String = value.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn product_status(product: &Product) -> ColoredString {
    let label = product.estado.as_str();
    match product.estado {
        ProductStatus::Agotado => label.red(),
        ProductStatus::Activo if product.is_low_stock() => format!("{} (stock bajo)", label).yellow(),
        ProductStatus::Activo => label.green(),
        ProductStatus::Inactivo | ProductStatus::Descontinuado => label.dimmed(),
    }
}

fn print_products(result: &QueryResult<'_, Product, InventoryStats>) {
    if result.is_empty() {
        println!("{}", "No products match".dimmed());
    }

    for product in &result.items {
        println!(
            "{:>6}  {:<32} {:>10.2} {:>6}/{:<6} {}",
            product.id,
            truncate(&product.nombre, 32),
            product.precio,
            product.stock,
            product.stock_minimo,
            product_status(product)
        );
    }

    let stats = &result.aggregates;
    println!();
    println!("{}", "Resumen".bold());
    println!("  total_productos:       {}", stats.total_productos);
    println!("  valor_inventario:      {:.2}", stats.valor_inventario);
    println!("  productos_agotados:    {}", stats.productos_agotados);
    println!("  productos_bajo_stock:  {}", stats.productos_bajo_stock);
    println!("  movimientos_recientes: {}", stats.movimientos_recientes);
}

fn notification_status(status: NotificationStatus) -> ColoredString {
    let label = status.as_str();
    match status {
        NotificationStatus::Pendiente | NotificationStatus::Programada => label.yellow(),
        NotificationStatus::Enviada => label.blue(),
        NotificationStatus::Leida => label.green(),
        NotificationStatus::Fallida => label.red(),
    }
}

fn print_notifications(result: &QueryResult<'_, Notification, NotificationStats>) {
    if result.is_empty() {
        println!("{}", "No notifications match".dimmed());
    }

    for notification in &result.items {
        println!(
            "{:>6}  {:<10} {:<12} {:<10} {:<20} {}",
            notification.id,
            notification_status(notification.estado),
            notification.tipo,
            notification.destinatario,
            notification.fecha_programada.as_deref().unwrap_or("-"),
            truncate(&notification.titulo, 40)
        );
    }

    let stats = &result.aggregates;
    println!();
    println!("{}", "Resumen".bold());
    println!("  total:         {}", stats.total);
    println!("  pendientes:    {}", stats.pendientes);
    println!("  enviadas:      {}", stats.enviadas);
    println!("  leidas:        {}", stats.leidas);
    println!("  tasa_apertura: {:.2}", stats.tasa_apertura);
}
