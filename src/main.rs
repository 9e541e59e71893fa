fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    if let Err(err) = funnel_rs_renderer::run() {
        match err.downcast_ref::<funnel_rs_renderer::FunnelError>() {
            Some(funnel_err) => eprintln!("error: {}", funnel_err.to_host_error()),
            None => eprintln!("error: {err:#}"),
        }
        std::process::exit(1);
    }
}
