use gitlab_deployments::deployments::{ListDeploymentsOptions, OrderBy, Sort};

fn help() {
    const HELP: &str = r#"
        GITLAB_URL=https://gitlab.com/api/v4 GITLAB_TOKEN=glpat-... \
            cargo run --example list-deployments -- gitlab-org/gitlab [search]
    "#;
    println!("{HELP}");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let mut args = std::env::args();
    // drop exec
    let _ = args.next();
    let Some(project) = args.next() else {
        help();
        return Ok(());
    };
    let search = args.next();

    let client = gitlab_deployments::config::from_env()?;

    let opts = ListDeploymentsOptions::new()
        .order_by(OrderBy::CreatedAt)
        .sort(Sort::Desc);
    let opts = match &search {
        Some(search) => opts.search(search),
        None => opts,
    };

    let resp = client.list_deployments(project, &opts).await?;

    for d in &resp.data {
        let created = d
            .created_at
            .map(|t| t.to_rfc3339())
            .unwrap_or_default();
        println!(
            "#{:<5} {:<20} {:<12} {} {} {}",
            d.iid, d.environment.name, d.deployable.status, d.git_ref, d.sha, created
        );
    }
    if let Some(total) = resp.pagination.total {
        println!("{} of {} deployments", resp.data.len(), total);
    }

    Ok(())
}
