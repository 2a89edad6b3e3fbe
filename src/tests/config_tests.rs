#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use tempfile::NamedTempFile;

    use crate::config::VideoConfig;
    use crate::implementations::config::{ ConfigError, GeneratorConfig };

    #[test]
    fn test_defaults() {
        let config = VideoConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("math_videos"));
        assert_eq!(config.renderer.program, "manim");
        assert_eq!(config.renderer.base_args, vec!["render".to_string()]);
        assert_eq!(config.generator.temperature, Some(0.7));
        assert_eq!(config.generator.max_tokens, Some(2000));
        assert!(config.generator.get_template("system").unwrap().contains("{{duration}}"));
        assert!(config.generator.get_template("user").unwrap().contains("{{topic}}"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "output_dir: renders\nrenderer:\n  program: /opt/manim/bin/manim\ngenerator:\n  llm_api:\n    provider: openai\n    model: gpt-4o-mini\n  temperature: 0.2\n"
        ).unwrap();

        let config = VideoConfig::from_file(file.path()).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("renders"));
        assert_eq!(config.renderer.program, "/opt/manim/bin/manim");
        assert_eq!(config.renderer.scene_extension, "py");
        assert_eq!(config.generator.temperature, Some(0.2));
        assert_eq!(config.generator.max_tokens, Some(2000));
        assert_eq!(config.generator.llm_api.provider, "openai");
        assert!(config.generator.get_template("user").is_ok());
    }

    #[test]
    fn test_invalid_yaml_is_a_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "output_dir: [unclosed").unwrap();
        assert!(matches!(VideoConfig::from_file(file.path()), Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let result = VideoConfig::load(Some(PathBuf::from("does/not/exist.yaml").as_path()));
        assert!(matches!(result, Err(ConfigError::FileReadError(_))));
    }

    #[test]
    fn test_explicit_api_key_wins() {
        let mut config = GeneratorConfig::default();
        config.llm_api.api_key = Some("sk-test".to_string());
        let (provider, key) = config.get_api_key().unwrap();
        assert_eq!(provider, "github");
        assert_eq!(key, "sk-test");
    }

    #[test]
    fn test_endpoint_overrides_apply_to_configured_provider_only() {
        let mut config = GeneratorConfig::default();
        config.llm_api.api_endpoint = Some("http://localhost:8080/v1/chat/completions".to_string());
        config.llm_api.model = Some("local-model".to_string());

        let (endpoint, model) = config.endpoint_for("github");
        assert_eq!(endpoint, "http://localhost:8080/v1/chat/completions");
        assert_eq!(model, "local-model");

        let (endpoint, model) = config.endpoint_for("anthropic");
        assert_eq!(endpoint, "https://api.anthropic.com/v1/messages");
        assert_ne!(model, "local-model");
    }

    #[test]
    fn test_missing_template_is_reported() {
        let mut config = GeneratorConfig::default();
        config.prompt_templates.remove("user");
        assert!(matches!(config.get_template("user"), Err(ConfigError::MissingTemplate(_))));
    }
}
