use pinmend::diagnosis::*;
use pinmend::PackageId;

fn names(log: &str) -> Vec<String> {
	diagnose(log).into_iter().map(String::from).collect()
}

#[test]
fn requirement_statement_yields_both_sides() {
	assert_eq!(names("pkgA==1.2 requires pkgB<2.0"), vec!["pkga", "pkgb"]);
}

#[test]
fn pip_resolver_report() {
	pinmend_test_utils::init_logging();
	assert_eq!(names(pinmend_test_utils::PIP_TORCH_CONFLICT), vec!["torch", "torchvision"]);
}

#[test]
fn traceback_without_versions_is_inconclusive() {
	assert!(diagnose(pinmend_test_utils::IMPORT_ERROR_TRACEBACK).is_empty());
}

#[test]
fn every_version_shape_is_recognised_case_insensitively() {
	for log in ["Keras==2.15.0", "Keras 2.15.0", "Keras (2.15.0)", "found Keras>=3"] {
		assert!(diagnose(log).contains(&PackageId::new("keras")), "keras not found in {:?}", log);
	}
}

#[test]
fn output_never_contains_noise_or_hyphens() {
	let logs = [
		"python 3.11.4 pip 24.0 wheel 0.42.0 setup (1.0.0)",
		"- 1.0 -- 2.0 -==1 _ 3.0",
		"a conflict between the package and version for setuptools",
		"Could not find a version that satisfies the requirement requirement",
		pinmend_test_utils::PIP_TORCH_CONFLICT,
	];
	for log in logs {
		for name in diagnose(log) {
			assert!(is_valid_package_name(name.as_str()), "{} leaked from {:?}", name, log);
			assert!(!NOISE_WORDS.contains(&name.as_str()));
			assert_ne!(name.as_str(), "-");
		}
	}
}

#[test]
fn pip_report_compresses_to_its_cause() {
	let ctx = compress_context(pinmend_test_utils::PIP_TORCH_CONFLICT);
	assert_eq!(ctx.constraints(), ["The user requested torch==2.1.0", "torchvision 0.17.0 depends on torch==2.2.0"]);
}

#[test]
fn compression_is_bounded() {
	let long_prose = "nothing to see here. ".repeat(1000);
	assert!(compress_context(&long_prose).to_string().chars().count() <= MAX_EXCERPT_CHARS);

	let many: String = (0..100).map(|i| format!("Conflict: pkg{} 1.{}\n", i, i)).collect();
	assert!(compress_context(&many).constraints().len() <= MAX_CONSTRAINT_LINES);
}
