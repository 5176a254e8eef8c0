use anyhow::Result;
use clap::{Parser, Subcommand};
use inventory_client::utils::logging;
use inventory_client::{App, Config, NewItem};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "inventory", author, version, about)]
struct Cli {
    /// 显示详细日志
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 登录并保存会话
    Login { identifier: String, password: String },
    /// 清除已保存的会话
    Logout,
    /// 显示当前登录用户
    Whoami,
    /// 分页列出物品
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        page_size: Option<u32>,
    },
    /// 列出当前用户收藏的物品
    Favorites {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        page_size: Option<u32>,
    },
    /// 列出物品类型
    Types,
    /// 显示物品详情
    Show { document_id: String },
    /// 新建物品
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// 图片文件
        #[arg(long)]
        photo: Option<PathBuf>,
        /// 同时收藏（需要登录）
        #[arg(long)]
        favorite: bool,
        /// 物品类型 id
        #[arg(long)]
        item_type: Option<u64>,
    },
    /// 删除物品
    Delete {
        document_id: String,
        /// 确认删除
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let config = Config::load()?;

    // 初始化日志
    logging::init(cli.verbose || config.verbose_logging);

    let mut app = App::initialize(config)?;
    if let Err(e) = run(&mut app, cli.command).await {
        error!("❌ {:#}", e);
        return Err(e);
    }
    Ok(())
}

async fn run(app: &mut App, command: Command) -> Result<()> {
    match command {
        Command::Login {
            identifier,
            password,
        } => app.login(&identifier, &password).await,
        Command::Logout => app.logout(),
        Command::Whoami => {
            app.whoami();
            Ok(())
        }
        Command::List { page, page_size } => app.list_items(page, page_size).await,
        Command::Favorites { page, page_size } => app.list_favorites(page, page_size).await,
        Command::Types => app.list_item_types().await,
        Command::Show { document_id } => app.show_item(&document_id).await,
        Command::Add {
            name,
            description,
            photo,
            favorite,
            item_type,
        } => {
            let new_item = NewItem {
                name,
                description,
                photo,
                favorite,
                item_type,
            };
            app.add_item(new_item).await.map(|_| ())
        }
        Command::Delete { document_id, yes } => {
            if !yes {
                info!("⚠️ 删除需要 --yes 确认: {}", document_id);
                return Ok(());
            }
            app.delete_item(&document_id).await
        }
    }
}
